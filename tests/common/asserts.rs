#![allow(dead_code)]

use super::headers::{cors_header_names, vary_values};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bunner_serverless_rs::{CorsOutcome, HeaderMap, PlatformResult, RejectReason};

pub fn assert_preflight_approved(outcome: CorsOutcome) -> HeaderMap {
    match outcome {
        CorsOutcome::PreflightApproved(headers) => headers,
        other => panic!("expected approved preflight, got {:?}", other),
    }
}

pub fn assert_preflight_rejected(outcome: CorsOutcome) -> RejectReason {
    match outcome {
        CorsOutcome::PreflightRejected(reason) => reason,
        other => panic!("expected rejected preflight, got {:?}", other),
    }
}

pub fn assert_default_reply<R: std::fmt::Debug>(result: PlatformResult<R>) -> R {
    match result {
        PlatformResult::DefaultReply(reply) => reply,
        other => panic!("expected default reply, got {:?}", other),
    }
}

pub fn assert_no_cors_headers(headers: &HeaderMap) {
    let names = cors_header_names(headers);
    assert!(names.is_empty(), "unexpected CORS headers: {names:?}");
}

pub fn assert_vary_contains(headers: &HeaderMap, value: &str) {
    assert!(
        vary_values(headers).contains(value),
        "expected Vary to contain {value}, got {:?}",
        vary_values(headers)
    );
}

pub fn decode_base64(body: &str) -> Vec<u8> {
    STANDARD.decode(body).expect("body is valid base64")
}
