//! Pre-trained price models.
//!
//! An artifact is a JSON document holding per-column encoders and a tree
//! ensemble:
//!
//! ```json
//! {
//!   "format": "propval-tree-ensemble",
//!   "version": 1,
//!   "target": "Price",
//!   "columns": ["Landsize", "Type", "Bedroom2", "Suburb", "Car", "Bathroom", "BuildingArea"],
//!   "encoders": [
//!     {"kind": "numeric", "column": "Landsize", "fill": 521.0},
//!     {"kind": "one_hot", "column": "Type", "categories": ["h", "t", "u"]}
//!   ],
//!   "estimator": {
//!     "kind": "random_forest",
//!     "trees": [
//!       {"nodes": [
//!         {"kind": "split", "feature": 0, "threshold": 400.0, "left": 1, "right": 2},
//!         {"kind": "leaf", "value": 850000.0},
//!         {"kind": "leaf", "value": 1100000.0}
//!       ]}
//!     ]
//!   }
//! }
//! ```
//!
//! Encoders run in column order and their outputs are concatenated; split
//! `feature` indices address that concatenated vector.

mod artifact;
mod encoder;
mod ensemble;
mod tree;

pub use artifact::{PriceModel, ARTIFACT_FORMAT, ARTIFACT_VERSION};
pub use encoder::ColumnEncoder;
pub use ensemble::Estimator;
pub use tree::{Node, Tree};

use crate::error::InferenceError;
use crate::models::{FeatureFrame, ModelSummary};

/// A fitted regressor that predicts one value per table row.
///
/// Implementations hold no mutable state, so one instance can serve
/// concurrent callers.
pub trait Regressor: Send + Sync {
    /// Column names the regressor was fit on, in order.
    fn columns(&self) -> &[String];

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, InferenceError>;

    fn summary(&self) -> ModelSummary;
}
