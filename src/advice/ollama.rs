use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::prompt::{build_advice_prompt, ADVICE_SYSTEM_PROMPT};
use super::templates::with_clinical_note;
use super::{AdviceError, AdviceFuture, Advisor};
use crate::assessment::{Measurements, RiskCategory};
use crate::config::DEFAULT_OLLAMA_URL;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Local LLM client abstraction (allows mocking)
pub trait LlmClient: Send + Sync {
    fn base_url(&self) -> &str;

    fn generate<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
        system: &'a str,
    ) -> AdviceFuture<'a, String>;

    fn list_models(&self) -> AdviceFuture<'_, Vec<String>>;
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AdviceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AdviceError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    /// Default Ollama instance at localhost:11434 with a 2-minute timeout.
    pub fn default_local() -> Result<Self, AdviceError> {
        Self::new(DEFAULT_OLLAMA_URL, crate::config::DEFAULT_OLLAMA_TIMEOUT_SECS)
    }

    fn send_error(&self, e: reqwest::Error) -> AdviceError {
        if e.is_connect() {
            AdviceError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            AdviceError::Timeout(self.timeout_secs)
        } else {
            AdviceError::HttpClient(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AdviceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(AdviceError::OllamaError {
            status: status.as_u16(),
            body,
        })
    }

    async fn post_generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, AdviceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    async fn get_tags(&self) -> Result<Vec<String>, AdviceError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        let response = Self::check_status(response).await?;

        let parsed: OllamaTagsResponse = response
            .json()
            .await
            .map_err(|e| AdviceError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate<'a>(
        &'a self,
        model: &'a str,
        prompt: &'a str,
        system: &'a str,
    ) -> AdviceFuture<'a, String> {
        Box::pin(self.post_generate(model, prompt, system))
    }

    fn list_models(&self) -> AdviceFuture<'_, Vec<String>> {
        Box::pin(self.get_tags())
    }
}

/// Advice written by a local MedGemma model.
pub struct OllamaAdvisor {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl OllamaAdvisor {
    pub fn new(client: Arc<dyn LlmClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn check_model(&self) -> Result<(), AdviceError> {
        let models = self.client.list_models().await?;
        if models.iter().any(|m| m.starts_with(&self.model)) {
            Ok(())
        } else {
            Err(AdviceError::ModelNotAvailable(self.model.clone()))
        }
    }

    async fn generate_advice(
        &self,
        category: RiskCategory,
        measurements: &Measurements,
    ) -> Result<String, AdviceError> {
        let prompt = build_advice_prompt(category, measurements);
        tracing::debug!(
            model = %self.model,
            base_url = self.client.base_url(),
            category = category.as_str(),
            "Requesting advice from language model"
        );

        let text = self
            .client
            .generate(&self.model, &prompt, ADVICE_SYSTEM_PROMPT)
            .await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AdviceError::EmptyResponse);
        }
        Ok(with_clinical_note(text, measurements))
    }
}

impl Advisor for OllamaAdvisor {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn advise<'a>(
        &'a self,
        category: RiskCategory,
        measurements: &'a Measurements,
    ) -> AdviceFuture<'a, String> {
        Box::pin(self.generate_advice(category, measurements))
    }

    fn check_ready(&self) -> AdviceFuture<'_, ()> {
        Box::pin(self.check_model())
    }
}

/// Mock LLM client for testing: returns a configurable reply.
#[cfg(test)]
pub struct MockLlmClient {
    reply: Result<String, AdviceError>,
    available_models: Vec<String>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
            available_models: vec!["medgemma:latest".to_string()],
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: AdviceError) -> Self {
        Self {
            reply: Err(error),
            ..Self::new("")
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl LlmClient for MockLlmClient {
    fn base_url(&self) -> &str {
        "mock://ollama"
    }

    fn generate<'a>(
        &'a self,
        _model: &'a str,
        prompt: &'a str,
        _system: &'a str,
    ) -> AdviceFuture<'a, String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Box::pin(std::future::ready(self.reply.clone()))
    }

    fn list_models(&self) -> AdviceFuture<'_, Vec<String>> {
        Box::pin(std::future::ready(Ok(self.available_models.clone())))
    }
}
