use serde::{Deserialize, Serialize};

/// Discrete diabetes risk produced by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    NoRisk,
    PreDiabetes,
    Diabetes,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [Self::NoRisk, Self::PreDiabetes, Self::Diabetes];

    /// Integer code returned by a persisted model's `predict`.
    pub fn code(self) -> u8 {
        match self {
            Self::NoRisk => 0,
            Self::PreDiabetes => 1,
            Self::Diabetes => 2,
        }
    }

    /// Map a model prediction back to a category.
    /// Codes above 1 are all treated as diabetes.
    pub fn from_prediction(code: u8) -> Self {
        match code {
            0 => Self::NoRisk,
            1 => Self::PreDiabetes,
            _ => Self::Diabetes,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoRisk => "no_risk",
            Self::PreDiabetes => "pre_diabetes",
            Self::Diabetes => "diabetes",
        }
    }

    /// Human-readable label shown next to the prediction.
    pub fn label(self) -> &'static str {
        match self {
            Self::NoRisk => "No diabetes risk",
            Self::PreDiabetes => "Pre-diabetes condition",
            Self::Diabetes => "Diabetes",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
