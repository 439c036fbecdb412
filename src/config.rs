use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::PathBuf;

use crate::advice::AdvisorKind;

/// Application-level constants
pub const APP_NAME: &str = "Diabestie";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the persisted classifier inside the data directory.
pub const MODEL_FILE_NAME: &str = "diabetes_model.json";

pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8501));
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "medgemma";
pub const DEFAULT_OLLAMA_TIMEOUT_SECS: u64 = 120;

// Environment variables read by `ServiceConfig::from_env`.
pub const ENV_BIND: &str = "DIABESTIE_BIND";
pub const ENV_MODEL_PATH: &str = "DIABESTIE_MODEL_PATH";
pub const ENV_ADVISOR: &str = "DIABESTIE_ADVISOR";
pub const ENV_OLLAMA_URL: &str = "OLLAMA_HOST";
pub const ENV_OLLAMA_MODEL: &str = "DIABESTIE_OLLAMA_MODEL";
pub const ENV_OLLAMA_TIMEOUT: &str = "DIABESTIE_OLLAMA_TIMEOUT_SECS";

/// Get the application data directory.
/// ~/Diabestie/ on all platforms, or ./Diabestie when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the persisted classifier.
pub fn default_model_path() -> PathBuf {
    app_data_dir().join(MODEL_FILE_NAME)
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "diabestie=info,diabestie_lib=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which advisor to use and how to reach the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisorConfig {
    pub kind: AdvisorKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub ollama_timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            kind: AdvisorKind::Template,
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            ollama_model: DEFAULT_OLLAMA_MODEL.to_string(),
            ollama_timeout_secs: DEFAULT_OLLAMA_TIMEOUT_SECS,
        }
    }
}

/// Runtime configuration of the assessment service.
///
/// Resolution order: built-in defaults, then environment variables,
/// then command-line flags (applied by the binary on top of this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub model_path: PathBuf,
    pub advisor: AdvisorConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            model_path: default_model_path(),
            advisor: AdvisorConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = non_empty(lookup(ENV_BIND)) {
            config.bind_addr = parse_bind_addr(ENV_BIND, &value)?;
        }
        if let Some(value) = non_empty(lookup(ENV_MODEL_PATH)) {
            config.model_path = PathBuf::from(value);
        }
        if let Some(value) = non_empty(lookup(ENV_ADVISOR)) {
            config.advisor.kind = value.parse().map_err(|e: crate::advice::AdviceError| {
                ConfigError::InvalidValue {
                    var: ENV_ADVISOR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(value) = non_empty(lookup(ENV_OLLAMA_URL)) {
            config.advisor.ollama_url = normalize_ollama_url(&value);
        }
        if let Some(value) = non_empty(lookup(ENV_OLLAMA_MODEL)) {
            config.advisor.ollama_model = value;
        }
        if let Some(value) = non_empty(lookup(ENV_OLLAMA_TIMEOUT)) {
            config.advisor.ollama_timeout_secs = value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    var: ENV_OLLAMA_TIMEOUT,
                    value: value.clone(),
                    reason: "expected a positive number of seconds".into(),
                })?;
        }

        Ok(config)
    }
}

/// Parse a `host:port` bind address.
pub fn parse_bind_addr(var: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// `OLLAMA_HOST` is often given without a scheme (`0.0.0.0:11434`).
pub fn normalize_ollama_url(value: &str) -> String {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
