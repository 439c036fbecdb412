//! Shared types for the assessment HTTP layer.

use std::sync::Arc;

use crate::assessment::Assessor;
use crate::model_store::ModelInfo;

/// Shared context for all routes and middleware.
///
/// Built once at startup; everything inside is read-only.
#[derive(Clone)]
pub struct ApiContext {
    pub assessor: Arc<Assessor>,
    pub model: Arc<ModelInfo>,
}

impl ApiContext {
    pub fn new(assessor: Assessor, model: ModelInfo) -> Self {
        Self {
            assessor: Arc::new(assessor),
            model: Arc::new(model),
        }
    }
}
