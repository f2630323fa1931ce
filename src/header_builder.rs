use crate::constants::header;
use crate::headers::HeaderMap;
use crate::options::CorsConfig;
use crate::origin::RequestOrigin;

pub(crate) struct HeaderBuilder<'a> {
    config: &'a CorsConfig,
}

impl<'a> HeaderBuilder<'a> {
    pub(crate) fn new(config: &'a CorsConfig) -> Self {
        Self { config }
    }

    /// `*` only when any origin is allowed and credentials are off; otherwise
    /// the request origin is echoed and caches must vary on it.
    pub(crate) fn build_origin_headers(&self, origin: &RequestOrigin) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        if self.config.allowed_origins().is_any() && !self.config.allow_credentials() {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*");
        } else {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.as_str());
            headers.add_vary(header::ORIGIN);
        }
        headers
    }

    pub(crate) fn build_credentials_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if self.config.allow_credentials() {
            headers.insert(header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true");
        }
        headers
    }

    pub(crate) fn build_max_age_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let max_age = self.config.max_age_seconds();
        if max_age > 0 {
            headers.insert(header::ACCESS_CONTROL_MAX_AGE, max_age.to_string());
        }
        headers
    }

    pub(crate) fn build_methods_header(&self, requested_method: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            requested_method.trim(),
        );
        headers
    }

    pub(crate) fn build_allowed_headers(&self, requested_headers: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = requested_headers
            && !value.trim().is_empty()
        {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, value.trim());
        }
        headers
    }

    pub(crate) fn build_exposed_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(value) = self.config.exposed_headers().header_value() {
            headers.insert(header::ACCESS_CONTROL_EXPOSE_HEADERS, value);
        }
        headers
    }
}

#[cfg(test)]
#[path = "header_builder_test.rs"]
mod header_builder_test;
