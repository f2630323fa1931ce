pub mod constants;
mod allowed_headers;
mod allowed_methods;
mod binary;
mod capture;
mod controller;
mod cors;
mod engine;
mod error;
mod exposed_headers;
mod fn_event;
mod gateway;
mod header_builder;
mod headers;
mod hooks;
mod options;
mod origin;
mod pubsub;
mod request;
mod response;
mod result;
mod same_origin;
mod settings;
mod transcoding;
mod translator;
mod util;
mod web_action;

pub use allowed_headers::AllowedHeaders;
pub use allowed_methods::AllowedMethods;
pub use binary::{BinaryDecision, BinaryPolicy};
pub use capture::{DiscardSink, ResponseCapture, ResponseSink};
pub use controller::{ControllerBuilder, LifecycleState, RequestLifecycleController};
pub use cors::CorsValidator;
pub use engine::{FnEngine, HttpEngine, Principal, RequestScope, engine_fn};
pub use error::{
    BoxError, CaptureError, DelegateError, EngineError, LifecycleError, ResponseCommitError,
    TranslationError,
};
pub use exposed_headers::ExposedHeaders;
pub use fn_event::{BodyEncoding, FunctionEvent, FunctionEventTranslator, FunctionReply};
pub use gateway::{
    GatewayIdentity, GatewayProxyEvent, GatewayProxyReply, GatewayProxyTranslator,
    GatewayRequestContext, ReplyMode,
};
pub use headers::HeaderMap;
pub use hooks::{DefaultHooks, LifecycleHooks};
pub use options::{ConfigError, CorsConfig, CorsConfigBuilder, DEFAULT_MAX_AGE_SECONDS};
pub use origin::{AllowedOrigins, OriginMatcher, PatternError, RequestOrigin};
pub use pubsub::{
    MessageAttribute, PubSubAck, PubSubEvent, PubSubMessage, PubSubRecord, PubSubTranslator,
};
pub use request::{CanonicalRequest, CanonicalRequestBuilder};
pub use response::{CapturedResponse, DataSource, Entity, EntityKind, PushWriterFn};
pub use result::{CorsOutcome, RejectReason};
pub use same_origin::{DefaultSameOriginPolicy, SameOriginPolicy};
pub use settings::{BridgeSettings, CorsSettings, SettingsError};
pub use transcoding::{
    ContentCoder, DeflateCoder, GzipCoder, PipelineError, TranscodingPipeline, TranscodingStage,
};
pub use translator::{PlatformResult, PlatformTranslator, ReplyFlags};
pub use util::{equals_ignore_case, is_binary_media_type, normalize_lower};
pub use web_action::{WebActionEvent, WebActionReply, WebActionTranslator, WebHeaderValue};
