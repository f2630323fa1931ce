#![allow(dead_code)]

use bunner_serverless_rs::constants::{header, method};
use bunner_serverless_rs::{
    CanonicalRequest, ControllerBuilder, CorsConfig, CorsOutcome, CorsValidator,
    GatewayProxyEvent, GatewayProxyTranslator, HttpEngine, RequestLifecycleController,
};
use serde_json::{Value, json};

pub const API: &str = "https://api.test/items";

pub fn validator<I, S>(origins: I, methods: &[&str]) -> CorsValidator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    CorsValidator::new(
        CorsConfig::builder()
            .allowed_origins(origins.into_iter().map(Into::into).collect::<Vec<String>>())
            .allowed_methods(methods.iter().copied())
            .build()
            .expect("valid CORS configuration"),
    )
}

pub struct RequestBuilder {
    method: String,
    uri: String,
    headers: Vec<(String, String)>,
}

impl RequestBuilder {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.into(),
            uri: API.into(),
            headers: Vec::new(),
        }
    }

    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn origin(self, origin: impl Into<String>) -> Self {
        self.header(header::ORIGIN, origin)
    }

    pub fn request_method(self, value: impl Into<String>) -> Self {
        self.header(header::ACCESS_CONTROL_REQUEST_METHOD, value)
    }

    pub fn request_headers(self, value: impl Into<String>) -> Self {
        self.header(header::ACCESS_CONTROL_REQUEST_HEADERS, value)
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> CanonicalRequest {
        self.headers
            .into_iter()
            .fold(
                CanonicalRequest::builder()
                    .method(self.method)
                    .request_uri(self.uri),
                |builder, (name, value)| builder.header(name, value),
            )
            .build()
            .expect("valid canonical request")
    }

    pub fn check(self, validator: &CorsValidator) -> CorsOutcome {
        validator.filter_request(&self.build())
    }
}

pub fn preflight_request() -> RequestBuilder {
    RequestBuilder::new(method::OPTIONS)
}

pub fn actual_request() -> RequestBuilder {
    RequestBuilder::new(method::GET)
}

pub struct GatewayEventBuilder {
    event: Value,
}

impl GatewayEventBuilder {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            event: json!({
                "httpMethod": method,
                "path": path,
                "multiValueHeaders": { "Host": ["api.test"] },
                "requestContext": { "stage": "test", "requestId": "req-1" }
            }),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.event["multiValueHeaders"][name] = json!([value]);
        self
    }

    pub fn body(mut self, body: &str, base64: bool) -> Self {
        self.event["body"] = json!(body);
        self.event["isBase64Encoded"] = json!(base64);
        self
    }

    pub fn principal(mut self, id: &str) -> Self {
        self.event["requestContext"]["authorizer"] = json!({ "principalId": id });
        self
    }

    pub fn build(self) -> GatewayProxyEvent {
        serde_json::from_value(self.event).expect("valid gateway event")
    }
}

pub fn gateway_event(method: &str, path: &str) -> GatewayEventBuilder {
    GatewayEventBuilder::new(method, path)
}

/// Initialized and started gateway controller.
pub fn started_gateway<E: HttpEngine>(
    engine: E,
    cors: Option<CorsValidator>,
) -> RequestLifecycleController<GatewayProxyTranslator, E> {
    super::init_tracing();
    let builder = ControllerBuilder::new(GatewayProxyTranslator::new());
    let builder = match cors {
        Some(validator) => builder.cors(validator),
        None => builder,
    };
    let controller = builder.build();
    controller.init(engine).expect("init succeeds");
    controller.start().expect("start succeeds");
    controller
}
