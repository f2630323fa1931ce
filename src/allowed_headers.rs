use crate::util::{normalize_lower, split_list};

/// Request headers a preflight may ask for.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum AllowedHeaders {
    /// Lower-cased, de-duplicated header names.
    List(Vec<String>),
    /// Every requested header is accepted.
    Any,
}

impl Default for AllowedHeaders {
    fn default() -> Self {
        AllowedHeaders::List(Vec::new())
    }
}

impl AllowedHeaders {
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let key = normalize_lower(value.into().trim());
            if key.is_empty() || deduped.contains(&key) {
                continue;
            }
            deduped.push(key);
        }

        Self::List(deduped)
    }

    pub fn any() -> Self {
        Self::Any
    }

    /// True when every entry of an `Access-Control-Request-Headers` value is allowed.
    pub fn allows_headers(&self, request_headers: &str) -> bool {
        match self {
            Self::Any => true,
            Self::List(allowed) => split_list(request_headers)
                .map(normalize_lower)
                .all(|header| allowed.contains(&header)),
        }
    }
}

#[cfg(test)]
#[path = "allowed_headers_test.rs"]
mod allowed_headers_test;
