use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_PORT: &str = "3000";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Process configuration, read once at startup.
///
/// A missing `AI_GATEWAY_API_KEY` is not fatal: the server starts and every
/// diet-plan request reports the service as not configured.
#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub gateway_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| {
            let port = non_empty("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
            format!("0.0.0.0:{}", port)
        });

        let request_timeout = match non_empty("AI_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: "AI_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            bind_addr,
            gateway_url: non_empty("AI_GATEWAY_URL").unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            model: non_empty("AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: non_empty("AI_GATEWAY_API_KEY"),
            request_timeout,
        })
    }
}
