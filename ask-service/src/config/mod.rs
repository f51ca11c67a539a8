use secrecy::Secret;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

/// Model used for every completion.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct AskConfig {
    pub common: core_config::Config,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub model: String,
}

impl AskConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(AskConfig {
            common,
            gemini: GeminiSettings {
                api_key: Secret::new(required_env(API_KEY_VAR)?),
                model: DEFAULT_GEMINI_MODEL.to_string(),
            },
        })
    }
}

fn required_env(key: &str) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}
