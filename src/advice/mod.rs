//! Advice generation.
//!
//! Two interchangeable `Advisor` implementations, selected by configuration:
//! - `TemplateAdvisor`: three fixed recommendations keyed by risk category
//! - `OllamaAdvisor`: asks a local MedGemma model through the Ollama API

pub mod ollama;
pub mod prompt;
pub mod templates;

pub use ollama::*;
pub use prompt::*;
pub use templates::*;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::{Measurements, RiskCategory};
use crate::config::AdvisorConfig;

#[derive(Error, Debug, Clone)]
pub enum AdviceError {
    #[error("Ollama is not running at {0}")]
    Connection(String),

    #[error("Ollama request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Ollama returned error (status {status}): {body}")]
    OllamaError { status: u16, body: String },

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Model returned an empty recommendation")]
    EmptyResponse,

    #[error("Model {0:?} is not installed in Ollama")]
    ModelNotAvailable(String),

    #[error("Unknown advisor {0:?} (expected \"template\" or \"ollama\")")]
    UnknownAdvisor(String),
}

/// Future returned by advisors and language-model clients.
pub type AdviceFuture<'a, T> = BoxFuture<'a, Result<T, AdviceError>>;

/// Turns a risk category into recommendation text.
pub trait Advisor: Send + Sync {
    fn name(&self) -> &'static str;

    /// `measurements` are for display and prompting only; they never change
    /// which recommendation applies.
    fn advise<'a>(
        &'a self,
        category: RiskCategory,
        measurements: &'a Measurements,
    ) -> AdviceFuture<'a, String>;

    /// Startup probe. Advisors without external dependencies are always ready.
    fn check_ready(&self) -> AdviceFuture<'_, ()> {
        Box::pin(std::future::ready(Ok(())))
    }
}

/// Advisor selected at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorKind {
    #[default]
    Template,
    Ollama,
}

impl AdvisorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for AdvisorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdvisorKind {
    type Err = AdviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(Self::Template),
            "ollama" | "medgemma" => Ok(Self::Ollama),
            _ => Err(AdviceError::UnknownAdvisor(s.to_string())),
        }
    }
}

/// Build the configured advisor.
pub fn build_advisor(config: &AdvisorConfig) -> Result<Arc<dyn Advisor>, AdviceError> {
    match config.kind {
        AdvisorKind::Template => Ok(Arc::new(TemplateAdvisor)),
        AdvisorKind::Ollama => {
            let client = OllamaClient::new(&config.ollama_url, config.ollama_timeout_secs)?;
            Ok(Arc::new(OllamaAdvisor::new(
                Arc::new(client),
                &config.ollama_model,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn advisor_kind_parses_case_insensitively() {
        assert_eq!(AdvisorKind::from_str("Template").unwrap(), AdvisorKind::Template);
        assert_eq!(AdvisorKind::from_str(" ollama ").unwrap(), AdvisorKind::Ollama);
        assert_eq!(AdvisorKind::from_str("medgemma").unwrap(), AdvisorKind::Ollama);
    }

    #[test]
    fn unknown_advisor_is_an_error() {
        let err = AdvisorKind::from_str("gpt").unwrap_err();
        assert!(matches!(err, AdviceError::UnknownAdvisor(ref s) if s == "gpt"));
    }

    #[test]
    fn advisor_kind_display_matches_serde() {
        for kind in [AdvisorKind::Template, AdvisorKind::Ollama] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[tokio::test]
    async fn template_advisor_is_always_ready() {
        assert!(TemplateAdvisor.check_ready().await.is_ok());
    }

    #[test]
    fn builds_template_advisor_by_default() {
        let advisor = build_advisor(&AdvisorConfig::default()).unwrap();
        assert_eq!(advisor.name(), "template");
    }

    #[test]
    fn builds_ollama_advisor() {
        let config = AdvisorConfig {
            kind: AdvisorKind::Ollama,
            ..AdvisorConfig::default()
        };
        let advisor = build_advisor(&config).unwrap();
        assert_eq!(advisor.name(), "ollama");
    }
}
