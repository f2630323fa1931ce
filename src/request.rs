use crate::constants::header;
use crate::error::TranslationError;
use crate::headers::HeaderMap;
use crate::util::is_http_token;
use http::Extensions;
use url::Url;

/// Platform-independent HTTP request handed to the embedded engine.
#[derive(Debug)]
pub struct CanonicalRequest {
    method: String,
    request_uri: Url,
    base_uri: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    context: Extensions,
}

impl CanonicalRequest {
    pub fn builder() -> CanonicalRequestBuilder {
        CanonicalRequestBuilder::default()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn request_uri(&self) -> &Url {
        &self.request_uri
    }

    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// Request path relative to the base uri, always starting with `/`.
    pub fn path(&self) -> &str {
        let base = self.base_uri.path();
        let full = self.request_uri.path();
        match full.strip_prefix(base.trim_end_matches('/')) {
            Some(rest) if rest.starts_with('/') => rest,
            _ => full,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Platform values attached by the translator. The controller never reads them.
    pub fn context(&self) -> &Extensions {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Extensions {
        &mut self.context
    }
}

#[derive(Debug, Default)]
pub struct CanonicalRequestBuilder {
    method: Option<String>,
    request_uri: Option<String>,
    base_uri: Option<String>,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
    context: Extensions,
}

impl CanonicalRequestBuilder {
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn request_uri(mut self, uri: impl Into<String>) -> Self {
        self.request_uri = Some(uri.into());
        self
    }

    /// Defaults to the root of the request uri's authority.
    pub fn base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn context<T>(mut self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.context.insert(value);
        self
    }

    pub fn build(self) -> Result<CanonicalRequest, TranslationError> {
        let method = self
            .method
            .map(|method| method.trim().to_ascii_uppercase())
            .filter(|method| !method.is_empty())
            .ok_or(TranslationError::MissingField("method"))?;
        if !is_http_token(&method) {
            return Err(TranslationError::InvalidMethod(method));
        }

        let raw_uri = self
            .request_uri
            .filter(|uri| !uri.trim().is_empty())
            .ok_or(TranslationError::MissingField("requestUri"))?;
        let request_uri = parse_uri(&raw_uri)?;

        let base_uri = match self.base_uri {
            Some(raw) => {
                let mut base = parse_uri(&raw)?;
                if !base.path().ends_with('/') {
                    let path = format!("{}/", base.path());
                    base.set_path(&path);
                }
                base
            }
            None => {
                let mut base = request_uri.clone();
                base.set_path("/");
                base.set_query(None);
                base.set_fragment(None);
                base
            }
        };

        Ok(CanonicalRequest {
            method,
            request_uri,
            base_uri,
            headers: self.headers,
            body: self.body,
            context: self.context,
        })
    }
}

fn parse_uri(raw: &str) -> Result<Url, TranslationError> {
    Url::parse(raw).map_err(|source| TranslationError::InvalidUri {
        uri: raw.to_string(),
        source,
    })
}

/// Joins an authority root, a decoded path and query pairs into one uri.
pub(crate) fn compose_uri<'a, I>(root: &str, path: &str, query: I) -> Result<Url, TranslationError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut uri = parse_uri(root)?;
    uri.set_path(path);

    let mut pairs = query.into_iter().peekable();
    if pairs.peek().is_some() {
        uri.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(uri)
}

/// Builds `scheme://authority` from forwarding headers, falling back to the
/// configured authority when the platform did not pass a `Host` header.
pub(crate) fn authority_root(headers: &HeaderMap, default_authority: &str) -> String {
    let scheme = headers
        .get(header::X_FORWARDED_PROTO)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or("https");
    let host = headers
        .get(header::HOST)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default_authority);

    format!("{scheme}://{host}")
}

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;
