use crate::binary::BinaryPolicy;
use crate::cors::CorsValidator;
use crate::options::{ConfigError, CorsConfig};
use crate::origin::{OriginMatcher, PatternError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid json")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid allowed origin pattern")]
    Pattern(#[from] PatternError),
}

/// Serializable form of a [`CorsConfig`]. Unset fields keep the builder defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    /// Case-insensitive patterns matched against the whole origin.
    pub allowed_origin_patterns: Vec<String>,
    pub allowed_methods: Option<Vec<String>>,
    /// `["*"]` allows any request header.
    pub allowed_headers: Option<Vec<String>>,
    pub exposed_headers: Vec<String>,
    pub max_age_seconds: Option<u64>,
    pub allow_credentials: Option<bool>,
}

impl CorsSettings {
    pub fn into_config(self) -> Result<CorsConfig, SettingsError> {
        let mut builder = CorsConfig::builder().allowed_origins(self.allowed_origins);
        for pattern in &self.allowed_origin_patterns {
            builder = builder.allowed_origin(OriginMatcher::pattern_str(pattern)?);
        }

        if let Some(methods) = self.allowed_methods {
            builder = builder.allowed_methods(methods);
        }
        builder = match self.allowed_headers {
            Some(headers) if headers.iter().any(|name| name.trim() == "*") => {
                builder.allow_any_header()
            }
            Some(headers) => builder.allowed_headers(headers),
            None => builder,
        };
        builder = builder.exposed_headers(self.exposed_headers);
        if let Some(seconds) = self.max_age_seconds {
            builder = builder.max_age_seconds(seconds);
        }
        if let Some(enabled) = self.allow_credentials {
            builder = builder.allow_credentials(enabled);
        }

        Ok(builder.build()?)
    }
}

/// Declarative controller settings, typically read from the function's environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeSettings {
    /// Absent disables CORS handling.
    pub cors: Option<CorsSettings>,
    pub binary: BinaryPolicy,
}

impl BridgeSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cors_validator(&self) -> Result<Option<CorsValidator>, SettingsError> {
        self.cors
            .clone()
            .map(|settings| settings.into_config().map(CorsValidator::new))
            .transpose()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;
