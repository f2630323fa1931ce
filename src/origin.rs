use crate::util::equals_ignore_case;
use regex_automata::meta::{BuildError, Regex};
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

const PATTERN_COMPILE_BUDGET: Duration = Duration::from_millis(100);
const MAX_PATTERN_LENGTH: usize = 50_000;
const MAX_ORIGIN_LENGTH: usize = 4_096;

/// A syntactically valid `Origin` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOrigin {
    literal: String,
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl RequestOrigin {
    /// Parses an `Origin` header. Scheme and host are required; path (other
    /// than `/`), query, fragment and user-info are rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let literal = value.trim();
        if literal.is_empty() || literal.len() > MAX_ORIGIN_LENGTH {
            return None;
        }

        let url = Url::parse(literal).ok()?;
        let host = url.host_str()?.to_string();
        if !url.username().is_empty()
            || url.password().is_some()
            || url.query().is_some()
            || url.fragment().is_some()
            || !matches!(url.path(), "" | "/")
            || literal.ends_with('/')
        {
            return None;
        }

        Some(Self {
            literal: literal.to_string(),
            scheme: url.scheme().to_string(),
            host,
            port: url.port(),
        })
    }

    /// The header value exactly as the client sent it, trimmed.
    pub fn as_str(&self) -> &str {
        &self.literal
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit port, `None` when the scheme default is used.
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal)
    }
}

#[derive(Debug)]
pub enum PatternError {
    Build(Box<BuildError>),
    Timeout { elapsed: Duration, budget: Duration },
    TooLong { length: usize, max: usize },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Build(_) => write!(f, "failed to compile origin pattern"),
            PatternError::Timeout { .. } => {
                write!(f, "compiling origin pattern exceeded the configured budget")
            }
            PatternError::TooLong { length, max } => write!(
                f,
                "origin pattern length {} exceeds maximum allowed {}",
                length, max
            ),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Build(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// One entry of an origin allow-list.
#[derive(Clone, Debug)]
pub enum OriginMatcher {
    Exact(String),
    Pattern(Regex),
}

impl OriginMatcher {
    pub fn exact<S: Into<String>>(value: S) -> Self {
        Self::Exact(value.into())
    }

    /// Compiles a case-insensitive pattern matched against the whole origin.
    pub fn pattern_str(pattern: &str) -> Result<Self, PatternError> {
        Self::compile_pattern(pattern, PATTERN_COMPILE_BUDGET).map(Self::Pattern)
    }

    fn compile_pattern(pattern: &str, budget: Duration) -> Result<Regex, PatternError> {
        if pattern.len() > MAX_PATTERN_LENGTH {
            return Err(PatternError::TooLong {
                length: pattern.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let started = Instant::now();
        let regex = Regex::new(&format!("(?i:^(?:{pattern})$)"))
            .map_err(|err| PatternError::Build(Box::new(err)))?;
        let elapsed = started.elapsed();
        if elapsed > budget {
            return Err(PatternError::Timeout { elapsed, budget });
        }

        Ok(regex)
    }

    #[cfg(test)]
    pub(crate) fn pattern_str_with_budget(
        pattern: &str,
        budget: Duration,
    ) -> Result<Self, PatternError> {
        Self::compile_pattern(pattern, budget).map(Self::Pattern)
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            OriginMatcher::Exact(value) => equals_ignore_case(value, candidate),
            OriginMatcher::Pattern(regex) => regex.is_match(candidate.as_bytes()),
        }
    }

    pub(crate) fn is_wildcard(&self) -> bool {
        matches!(self, OriginMatcher::Exact(value) if value.trim() == "*")
    }
}

impl From<String> for OriginMatcher {
    fn from(value: String) -> Self {
        OriginMatcher::Exact(value)
    }
}

impl From<&str> for OriginMatcher {
    fn from(value: &str) -> Self {
        OriginMatcher::Exact(value.to_owned())
    }
}

/// Origins permitted to make cross-origin requests.
#[derive(Clone, Debug, Default)]
pub enum AllowedOrigins {
    #[default]
    Any,
    List(Vec<OriginMatcher>),
}

impl AllowedOrigins {
    pub fn any() -> Self {
        Self::Any
    }

    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OriginMatcher>,
    {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, AllowedOrigins::Any)
    }

    pub fn allows(&self, origin: &RequestOrigin) -> bool {
        match self {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(matchers) => {
                matchers.iter().any(|matcher| matcher.matches(origin.as_str()))
            }
        }
    }
}

#[cfg(test)]
#[path = "origin_test.rs"]
mod origin_test;
