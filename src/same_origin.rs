use crate::origin::RequestOrigin;
use crate::request::CanonicalRequest;
use crate::util::equals_ignore_case;

/// Decides whether a request's `Origin` is the origin serving the request.
/// Same-origin requests bypass CORS handling entirely.
pub trait SameOriginPolicy: Send + Sync {
    fn is_same_origin(&self, request: &CanonicalRequest, origin: &RequestOrigin) -> bool;
}

impl<F> SameOriginPolicy for F
where
    F: Fn(&CanonicalRequest, &RequestOrigin) -> bool + Send + Sync,
{
    fn is_same_origin(&self, request: &CanonicalRequest, origin: &RequestOrigin) -> bool {
        self(request, origin)
    }
}

/// Compares `scheme://host[:port]` of the request uri (default ports 80 and
/// 443 omitted) with the literal origin, ignoring case.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSameOriginPolicy;

impl DefaultSameOriginPolicy {
    pub(crate) fn serving_origin(request: &CanonicalRequest) -> Option<String> {
        let uri = request.request_uri();
        let host = uri.host_str()?;
        let scheme = uri.scheme();
        let port = uri
            .port()
            .filter(|port| !matches!((scheme, *port), ("http", 80) | ("https", 443)));

        Some(match port {
            Some(port) => format!("{scheme}://{host}:{port}"),
            None => format!("{scheme}://{host}"),
        })
    }
}

impl SameOriginPolicy for DefaultSameOriginPolicy {
    fn is_same_origin(&self, request: &CanonicalRequest, origin: &RequestOrigin) -> bool {
        Self::serving_origin(request)
            .is_some_and(|serving| equals_ignore_case(&serving, origin.as_str()))
    }
}

#[cfg(test)]
#[path = "same_origin_test.rs"]
mod same_origin_test;
