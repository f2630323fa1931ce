use crate::constants::method;
use crate::util::equals_ignore_case;

/// Methods accepted for cross-origin requests.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AllowedMethods {
    values: Vec<String>,
}

impl AllowedMethods {
    /// Builds the list, trimming entries and keeping the first of any
    /// case-insensitive duplicates.
    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut deduped: Vec<String> = Vec::new();
        for value in values {
            let trimmed = value.into().trim().to_string();
            if deduped
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(&trimmed))
            {
                continue;
            }
            deduped.push(trimmed);
        }

        Self { values: deduped }
    }

    pub fn allows(&self, method: &str) -> bool {
        let method = method.trim();
        self.values
            .iter()
            .any(|allowed| equals_ignore_case(allowed, method))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.values
    }
}

impl Default for AllowedMethods {
    fn default() -> Self {
        Self::list([
            method::GET,
            method::POST,
            method::PUT,
            method::DELETE,
            method::OPTIONS,
            method::HEAD,
        ])
    }
}

#[cfg(test)]
#[path = "allowed_methods_test.rs"]
mod allowed_methods_test;
