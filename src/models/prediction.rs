use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::format::format_price;

/// A single price estimate as returned by the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub price: f64,
    /// Display form, e.g. `$850,000`.
    pub formatted: String,
}

impl PredictionResponse {
    pub fn from_price(price: f64) -> Self {
        Self {
            price,
            formatted: format_price(price),
        }
    }
}

/// What a loaded regressor reports about itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Estimator kind, e.g. `random_forest`.
    pub kind: String,
    pub version: u64,
    pub trees: usize,
    /// Deepest root-to-leaf path across all trees.
    pub max_depth: usize,
    /// Name of the predicted quantity.
    pub target: String,
}

/// A model summary with its load provenance, used for detailed responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(flatten)]
    pub summary: ModelSummary,
    pub columns: Vec<String>,
    /// Path the artifact was read from, if it came from disk.
    pub source: Option<String>,
    pub known_suburbs: usize,
    pub loaded_at: DateTime<Utc>,
}
