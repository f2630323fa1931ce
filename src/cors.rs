use crate::constants::{header, method, status};
use crate::header_builder::HeaderBuilder;
use crate::headers::HeaderMap;
use crate::options::CorsConfig;
use crate::origin::RequestOrigin;
use crate::request::CanonicalRequest;
use crate::response::CapturedResponse;
use crate::result::{CorsOutcome, RejectReason};

/// Platform-independent CORS filter evaluated around every dispatch.
///
/// Holds no mutable state and can be shared across threads freely.
#[derive(Debug, Clone, Default)]
pub struct CorsValidator {
    config: CorsConfig,
}

impl CorsValidator {
    pub fn new(config: CorsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorsConfig {
        &self.config
    }

    /// Request-side filter.
    pub fn filter_request(&self, request: &CanonicalRequest) -> CorsOutcome {
        let Some(raw_origin) = request.header(header::ORIGIN) else {
            return CorsOutcome::NotCors;
        };

        let Some(origin) = RequestOrigin::parse(raw_origin) else {
            tracing::debug!(origin = raw_origin, "rejecting malformed origin");
            return CorsOutcome::ActualRejected(RejectReason::InvalidOrigin);
        };

        if self
            .config
            .same_origin_policy()
            .is_same_origin(request, &origin)
        {
            return CorsOutcome::SameOrigin;
        }

        let requested_method = request.header(header::ACCESS_CONTROL_REQUEST_METHOD);
        if requested_method.is_some_and(|value| value.trim().is_empty()) {
            tracing::debug!(%origin, "rejecting blank access-control-request-method");
            return CorsOutcome::ActualRejected(RejectReason::InvalidRequestMethod);
        }

        match requested_method {
            Some(requested) if request.method().eq_ignore_ascii_case(method::OPTIONS) => {
                let requested_headers = request
                    .headers()
                    .get_all(header::ACCESS_CONTROL_REQUEST_HEADERS);
                let requested_headers =
                    (!requested_headers.is_empty()).then(|| requested_headers.join(","));
                self.evaluate_preflight(&origin, requested, requested_headers.as_deref())
            }
            _ => self.evaluate_actual(origin, request.method()),
        }
    }

    fn evaluate_preflight(
        &self,
        origin: &RequestOrigin,
        requested_method: &str,
        requested_headers: Option<&str>,
    ) -> CorsOutcome {
        let rejection = if !self.config.allowed_origins().allows(origin) {
            Some(RejectReason::OriginNotAllowed)
        } else if !self.config.allowed_methods().allows(requested_method) {
            Some(RejectReason::MethodNotAllowed)
        } else if !self
            .config
            .allowed_headers()
            .allows_headers(requested_headers.unwrap_or_default())
        {
            Some(RejectReason::HeadersNotAllowed)
        } else {
            None
        };

        if let Some(reason) = rejection {
            tracing::debug!(%origin, %reason, "preflight rejected");
            return CorsOutcome::PreflightRejected(reason);
        }

        let builder = HeaderBuilder::new(&self.config);
        let mut headers = HeaderMap::with_capacity(6);
        headers.extend(builder.build_origin_headers(origin));
        headers.extend(builder.build_credentials_header());
        headers.extend(builder.build_max_age_header());
        headers.extend(builder.build_methods_header(requested_method));
        headers.extend(builder.build_allowed_headers(requested_headers));

        tracing::debug!(%origin, method = requested_method, "preflight approved");
        CorsOutcome::PreflightApproved(headers)
    }

    fn evaluate_actual(&self, origin: RequestOrigin, request_method: &str) -> CorsOutcome {
        let rejection = if !self.config.allowed_origins().allows(&origin) {
            Some(RejectReason::OriginNotAllowed)
        } else if !self.config.allowed_methods().allows(request_method) {
            Some(RejectReason::MethodNotAllowed)
        } else {
            None
        };

        match rejection {
            Some(reason) => {
                tracing::debug!(%origin, %reason, "cross-origin request marked as failed");
                CorsOutcome::ActualRejected(reason)
            }
            None => CorsOutcome::ActualApproved(origin),
        }
    }

    /// Response-side filter. Only approved actual requests receive headers.
    pub fn filter_response(&self, outcome: &CorsOutcome, headers: &mut HeaderMap) {
        let CorsOutcome::ActualApproved(origin) = outcome else {
            return;
        };

        let builder = HeaderBuilder::new(&self.config);
        for name in [
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
        ] {
            headers.remove(name);
        }
        headers.extend(builder.build_origin_headers(origin));
        headers.extend(builder.build_credentials_header());
        headers.extend(builder.build_exposed_headers());
    }

    /// Reply that answers the request without dispatching it, if any.
    pub fn short_circuit(outcome: &CorsOutcome) -> Option<CapturedResponse> {
        match outcome {
            CorsOutcome::PreflightApproved(headers) => {
                let mut response = CapturedResponse::new(status::OK);
                response.headers = headers.clone();
                Some(response)
            }
            CorsOutcome::PreflightRejected(_) => Some(CapturedResponse::forbidden()),
            CorsOutcome::ActualRejected(reason) if reason.is_terminal() => {
                Some(CapturedResponse::forbidden())
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "cors_test.rs"]
mod cors_test;
