use crate::allowed_headers::AllowedHeaders;
use crate::allowed_methods::AllowedMethods;
use crate::exposed_headers::ExposedHeaders;
use crate::origin::{AllowedOrigins, OriginMatcher};
use crate::same_origin::{DefaultSameOriginPolicy, SameOriginPolicy};
use crate::util::is_http_token;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_MAX_AGE_SECONDS: u64 = 3600;

/// Immutable CORS configuration. Build it with [`CorsConfig::builder`].
#[derive(Clone)]
pub struct CorsConfig {
    allowed_origins: AllowedOrigins,
    allowed_methods: AllowedMethods,
    allowed_headers: AllowedHeaders,
    exposed_headers: ExposedHeaders,
    max_age_seconds: u64,
    allow_credentials: bool,
    same_origin_policy: Arc<dyn SameOriginPolicy>,
}

impl CorsConfig {
    pub fn builder() -> CorsConfigBuilder {
        CorsConfigBuilder::default()
    }

    pub fn allowed_origins(&self) -> &AllowedOrigins {
        &self.allowed_origins
    }

    pub fn allowed_methods(&self) -> &AllowedMethods {
        &self.allowed_methods
    }

    pub fn allowed_headers(&self) -> &AllowedHeaders {
        &self.allowed_headers
    }

    pub fn exposed_headers(&self) -> &ExposedHeaders {
        &self.exposed_headers
    }

    pub fn max_age_seconds(&self) -> u64 {
        self.max_age_seconds
    }

    pub fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    pub fn same_origin_policy(&self) -> &dyn SameOriginPolicy {
        self.same_origin_policy.as_ref()
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: AllowedOrigins::Any,
            allowed_methods: AllowedMethods::default(),
            allowed_headers: AllowedHeaders::default(),
            exposed_headers: ExposedHeaders::default(),
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            allow_credentials: true,
            same_origin_policy: Arc::new(DefaultSameOriginPolicy),
        }
    }
}

impl fmt::Debug for CorsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorsConfig")
            .field("allowed_origins", &self.allowed_origins)
            .field("allowed_methods", &self.allowed_methods)
            .field("allowed_headers", &self.allowed_headers)
            .field("exposed_headers", &self.exposed_headers)
            .field("max_age_seconds", &self.max_age_seconds)
            .field("allow_credentials", &self.allow_credentials)
            .finish_non_exhaustive()
    }
}

/// Errors raised while building a [`CorsConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the \"*\" origin cannot be combined with other allowed origins")]
    WildcardOriginNotExclusive,
    #[error("allowed methods must not be empty")]
    EmptyAllowedMethods,
    #[error("`{0}` is not a valid HTTP method token")]
    InvalidMethod(String),
    #[error("`{0}` is not a valid HTTP header name")]
    InvalidHeaderName(String),
    #[error("allowed origin entries must not be empty")]
    EmptyOrigin,
}

#[derive(Default)]
pub struct CorsConfigBuilder {
    origins: Vec<OriginMatcher>,
    methods: Option<Vec<String>>,
    allowed_headers: Option<AllowedHeaders>,
    exposed_headers: Vec<String>,
    max_age_seconds: Option<u64>,
    allow_credentials: Option<bool>,
    same_origin_policy: Option<Arc<dyn SameOriginPolicy>>,
}

impl CorsConfigBuilder {
    pub fn allowed_origin(mut self, origin: impl Into<OriginMatcher>) -> Self {
        self.origins.push(origin.into());
        self
    }

    pub fn allowed_origins<I, T>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OriginMatcher>,
    {
        self.origins.extend(origins.into_iter().map(Into::into));
        self
    }

    pub fn allowed_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = Some(methods.into_iter().map(Into::into).collect());
        self
    }

    pub fn allowed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_headers = Some(AllowedHeaders::list(headers));
        self
    }

    pub fn allow_any_header(mut self) -> Self {
        self.allowed_headers = Some(AllowedHeaders::Any);
        self
    }

    pub fn exposed_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exposed_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// `0` suppresses `Access-Control-Max-Age`.
    pub fn max_age_seconds(mut self, seconds: u64) -> Self {
        self.max_age_seconds = Some(seconds);
        self
    }

    pub fn allow_credentials(mut self, enabled: bool) -> Self {
        self.allow_credentials = Some(enabled);
        self
    }

    pub fn same_origin_policy<P>(mut self, policy: P) -> Self
    where
        P: SameOriginPolicy + 'static,
    {
        self.same_origin_policy = Some(Arc::new(policy));
        self
    }

    pub fn build(self) -> Result<CorsConfig, ConfigError> {
        let defaults = CorsConfig::default();

        let allowed_origins = Self::resolve_origins(self.origins)?;

        let allowed_methods = match self.methods {
            Some(methods) => {
                let methods = AllowedMethods::list(methods);
                if methods.is_empty() {
                    return Err(ConfigError::EmptyAllowedMethods);
                }
                if let Some(invalid) = methods.iter().find(|method| !is_http_token(method)) {
                    return Err(ConfigError::InvalidMethod(invalid.to_string()));
                }
                methods
            }
            None => defaults.allowed_methods,
        };

        let allowed_headers = self.allowed_headers.unwrap_or(defaults.allowed_headers);
        if let AllowedHeaders::List(names) = &allowed_headers
            && let Some(invalid) = names.iter().find(|name| !is_http_token(name))
        {
            return Err(ConfigError::InvalidHeaderName(invalid.clone()));
        }

        let exposed_headers = ExposedHeaders::list(self.exposed_headers);
        if let Some(invalid) = exposed_headers
            .values()
            .iter()
            .find(|name| !is_http_token(name))
        {
            return Err(ConfigError::InvalidHeaderName(invalid.clone()));
        }

        Ok(CorsConfig {
            allowed_origins,
            allowed_methods,
            allowed_headers,
            exposed_headers,
            max_age_seconds: self.max_age_seconds.unwrap_or(defaults.max_age_seconds),
            allow_credentials: self
                .allow_credentials
                .unwrap_or(defaults.allow_credentials),
            same_origin_policy: self
                .same_origin_policy
                .unwrap_or(defaults.same_origin_policy),
        })
    }

    fn resolve_origins(origins: Vec<OriginMatcher>) -> Result<AllowedOrigins, ConfigError> {
        if origins.is_empty() {
            return Ok(AllowedOrigins::Any);
        }

        if origins
            .iter()
            .any(|matcher| {
                matches!(matcher, OriginMatcher::Exact(value) if value.trim().is_empty())
            })
        {
            return Err(ConfigError::EmptyOrigin);
        }

        let wildcards = origins.iter().filter(|matcher| matcher.is_wildcard()).count();
        match (wildcards, origins.len()) {
            (0, _) => Ok(AllowedOrigins::List(origins)),
            (1, 1) => Ok(AllowedOrigins::Any),
            _ => Err(ConfigError::WildcardOriginNotExclusive),
        }
    }
}

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;
