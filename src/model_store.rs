//! Persisted classifier.
//!
//! The setup step writes the model once as a small JSON envelope; the
//! service reads it once at startup. A missing or invalid file is fatal
//! for the service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::assessment::{Classifier, GlucoseThresholdClassifier, ThresholdError};

/// Version written by `save_model` and accepted by `load_model`.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ModelStoreError {
    #[error("Model file not found at {} (run `diabestie init-model` first)", .0.display())]
    NotFound(PathBuf),

    #[error("Model file already exists at {} (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed model file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize model for {}: {source}", .path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("Invalid model: {0}")]
    InvalidModel(#[from] ThresholdError),
}

/// The model itself, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    GlucoseThreshold(GlucoseThresholdClassifier),
}

impl ModelSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GlucoseThreshold(_) => "glucose_threshold",
        }
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        match self {
            Self::GlucoseThreshold(rule) => rule.validate(),
        }
    }

    pub fn into_classifier(self) -> Arc<dyn Classifier> {
        match self {
            Self::GlucoseThreshold(rule) => Arc::new(rule),
        }
    }
}

/// On-disk envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModel {
    pub format_version: u32,
    pub created_at: String,
    pub model: ModelSpec,
}

impl PersistedModel {
    pub fn new(model: ModelSpec) -> Self {
        Self {
            format_version: MODEL_FORMAT_VERSION,
            created_at: chrono::Utc::now().to_rfc3339(),
            model,
        }
    }

    /// The demo rule: glucose thresholds 140 and 200.
    pub fn glucose_threshold_default() -> Self {
        Self::new(ModelSpec::GlucoseThreshold(GlucoseThresholdClassifier::default()))
    }
}

/// What was loaded (or saved), for logs and the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Server-local; logged but never sent over HTTP.
    #[serde(skip_serializing)]
    pub path: String,
    pub fingerprint: String,
    pub kind: &'static str,
    pub format_version: u32,
    pub created_at: String,
}

impl ModelInfo {
    fn describe(path: &Path, bytes: &[u8], model: &PersistedModel) -> Self {
        Self {
            path: path.display().to_string(),
            fingerprint: fingerprint(bytes),
            kind: model.model.kind(),
            format_version: model.format_version,
            created_at: model.created_at.clone(),
        }
    }
}

pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub info: ModelInfo,
}

/// SHA-256 of the model file contents.
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// Write `model` to `path`, creating parent directories.
///
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_model(
    path: &Path,
    model: &PersistedModel,
    overwrite: bool,
) -> Result<ModelInfo, ModelStoreError> {
    model.model.validate()?;

    if path.exists() && !overwrite {
        return Err(ModelStoreError::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ModelStoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bytes = serde_json::to_vec_pretty(model).map_err(|source| ModelStoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, &bytes).map_err(|source| ModelStoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let info = ModelInfo::describe(path, &bytes, model);
    tracing::info!(
        path = %info.path,
        kind = info.kind,
        fingerprint = %info.fingerprint,
        "Model saved"
    );
    Ok(info)
}

/// Read and validate the model at `path`.
pub fn load_model(path: &Path) -> Result<LoadedModel, ModelStoreError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ModelStoreError::NotFound(path.to_path_buf())
        } else {
            ModelStoreError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let persisted: PersistedModel =
        serde_json::from_slice(&bytes).map_err(|source| ModelStoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if persisted.format_version != MODEL_FORMAT_VERSION {
        return Err(ModelStoreError::UnsupportedVersion {
            found: persisted.format_version,
            expected: MODEL_FORMAT_VERSION,
        });
    }
    persisted.model.validate()?;

    let info = ModelInfo::describe(path, &bytes, &persisted);
    tracing::info!(
        path = %info.path,
        kind = info.kind,
        fingerprint = %info.fingerprint,
        created_at = %info.created_at,
        "Model loaded"
    );

    Ok(LoadedModel {
        classifier: persisted.model.into_classifier(),
        info,
    })
}
