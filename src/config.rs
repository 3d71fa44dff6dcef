//! Server configuration from environment variables

use crate::llm::DEFAULT_BASE_URL;
use crate::orchestrator::OrchestratorConfig;
use crate::persona::Persona;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub model: String,
    pub persona: Persona,
    pub request_timeout: Duration,
    pub max_history_messages: Option<usize>,
    pub gemini_base_url: String,
    /// `None` leaves the server running with every turn failing fast
    pub api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("SALOM_PORT") {
            Some(v) => parse_number("SALOM_PORT", &v)?,
            None => DEFAULT_PORT,
        };

        let persona = match get("SALOM_PERSONA") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                key: "SALOM_PERSONA",
                reason,
            })?,
            None => Persona::default(),
        };

        let timeout_secs: u64 = match get("SALOM_REQUEST_TIMEOUT_SECS") {
            Some(v) => parse_number("SALOM_REQUEST_TIMEOUT_SECS", &v)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "SALOM_REQUEST_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let max_history_messages = get("SALOM_MAX_HISTORY")
            .map(|v| parse_number("SALOM_MAX_HISTORY", &v))
            .transpose()?;

        Ok(Self {
            port,
            model: get("SALOM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            persona,
            request_timeout: Duration::from_secs(timeout_secs),
            max_history_messages,
            gemini_base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
        })
    }

    pub fn orchestrator(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            persona: self.persona,
            timeout: self.request_timeout,
            max_history_messages: self.max_history_messages,
        }
    }
}

fn parse_number<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: format!("'{value}': {e}"),
    })
}
