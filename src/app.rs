//! Top-level commands: run the service, write the model, assess once.

use std::path::Path;
use std::sync::Arc;

use crate::advice::{build_advisor, AdviceError, TemplateAdvisor};
use crate::api::{serve_until_ctrl_c, ApiContext, ServerError};
use crate::assessment::{Assessment, Assessor, Measurements, ValidationError};
use crate::config::{ConfigError, ServiceConfig, APP_NAME, APP_VERSION};
use crate::model_store::{load_model, save_model, ModelInfo, ModelStoreError, PersistedModel};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    ModelStore(#[from] ModelStoreError),

    #[error(transparent)]
    Advice(#[from] AdviceError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Cannot serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load the model, build the advisor and serve until Ctrl-C.
///
/// A missing or invalid model file is fatal. An unreachable language model
/// is not: requests fall back to template advice.
pub async fn serve(config: ServiceConfig) -> Result<(), AppError> {
    tracing::info!("{APP_NAME} starting v{APP_VERSION}");

    let loaded = load_model(&config.model_path)?;
    let advisor = build_advisor(&config.advisor)?;

    if let Err(e) = advisor.check_ready().await {
        tracing::warn!(
            advisor = advisor.name(),
            error = %e,
            "Advisor not ready; template advice will be used until it recovers"
        );
    }

    tracing::info!(
        advisor = advisor.name(),
        classifier = loaded.classifier.kind(),
        bind = %config.bind_addr,
        "Service configured"
    );

    let ctx = ApiContext::new(Assessor::new(loaded.classifier, advisor), loaded.info);
    serve_until_ctrl_c(ctx, config.bind_addr).await?;
    Ok(())
}

/// Write the default glucose-threshold model to `path`.
pub fn init_model(path: &Path, force: bool) -> Result<ModelInfo, AppError> {
    Ok(save_model(path, &PersistedModel::glucose_threshold_default(), force)?)
}

/// Evaluate one set of measurements with the template advisor.
pub async fn assess_once(
    model_path: &Path,
    measurements: Measurements,
) -> Result<Assessment, AppError> {
    let loaded = load_model(model_path)?;
    let assessor = Assessor::new(loaded.classifier, Arc::new(TemplateAdvisor));
    Ok(assessor.assess(measurements).await?)
}

/// Plain-text rendering for the terminal.
pub fn render_text(assessment: &Assessment) -> String {
    format!(
        "Prediction: {}\n\nClinical Recommendation:\n{}\n\n{}\n",
        assessment.label, assessment.advice, assessment.disclaimer
    )
}

/// Pretty JSON rendering for scripts.
pub fn render_json(assessment: &Assessment) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(assessment)?)
}
