use std::path::Path;

use serde::{Deserialize, Serialize};

use super::encoder::ColumnEncoder;
use super::ensemble::Estimator;
use super::Regressor;
use crate::error::{ArtifactLoadError, InferenceError};
use crate::models::{Cell, FeatureFrame, FeatureRecord, ModelSummary};

/// Format tag every artifact carries.
pub const ARTIFACT_FORMAT: &str = "propval-tree-ensemble";

/// The only artifact version this build reads.
pub const ARTIFACT_VERSION: u64 = 1;

fn default_target() -> String {
    "Price".to_string()
}

/// A pre-trained price model: column encoders followed by a tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceModel {
    pub format: String,
    pub version: u64,
    #[serde(default = "default_target")]
    pub target: String,
    /// Input columns in training order.
    pub columns: Vec<String>,
    /// One encoder per column, in column order.
    pub encoders: Vec<ColumnEncoder>,
    pub estimator: Estimator,
}

impl PriceModel {
    /// Read and validate the artifact at `path`.
    ///
    /// The format tag and version are checked before the body is decoded, so
    /// an artifact written by a newer producer reports as incompatible rather
    /// than corrupt.
    pub fn load(path: &Path) -> Result<Self, ArtifactLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ArtifactLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| ArtifactLoadError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?;

        let model = Self::from_value(value)?;
        tracing::debug!(
            "Loaded {} with {} trees from {}",
            model.estimator.kind(),
            model.estimator.trees().len(),
            path.display()
        );
        Ok(model)
    }

    /// Decode and validate an artifact already parsed as JSON.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ArtifactLoadError> {
        let format = value.get("format").and_then(|f| f.as_str()).unwrap_or("");
        if format != ARTIFACT_FORMAT {
            return Err(ArtifactLoadError::UnsupportedFormat(format.to_string()));
        }

        let version = value
            .get("version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ArtifactLoadError::Invalid("missing version".to_string()))?;
        if version != ARTIFACT_VERSION {
            return Err(ArtifactLoadError::IncompatibleVersion {
                found: version,
                supported: ARTIFACT_VERSION,
            });
        }

        let model: Self = serde_json::from_value(value)
            .map_err(|e| ArtifactLoadError::Invalid(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }

    /// Check the column schema and the structure of every tree.
    pub fn validate(&self) -> Result<(), ArtifactLoadError> {
        if self.columns.iter().map(String::as_str).ne(FeatureRecord::COLUMNS) {
            return Err(ArtifactLoadError::SchemaMismatch {
                expected: FeatureRecord::COLUMNS.iter().map(|c| c.to_string()).collect(),
                found: self.columns.clone(),
            });
        }

        if self.encoders.len() != self.columns.len() {
            return Err(ArtifactLoadError::Invalid(format!(
                "{} encoders for {} columns",
                self.encoders.len(),
                self.columns.len()
            )));
        }
        for (encoder, column) in self.encoders.iter().zip(&self.columns) {
            if encoder.column() != column {
                return Err(ArtifactLoadError::Invalid(format!(
                    "encoder for {} found where {} was expected",
                    encoder.column(),
                    column
                )));
            }
        }

        self.estimator
            .validate(self.encoded_width())
            .map_err(ArtifactLoadError::Invalid)
    }

    /// Number of model input slots after encoding.
    pub fn encoded_width(&self) -> usize {
        self.encoders.iter().map(ColumnEncoder::width).sum()
    }

    fn encode_row(&self, row: &[Cell]) -> Result<Vec<f64>, InferenceError> {
        if row.len() != self.encoders.len() {
            return Err(InferenceError::RowWidth {
                expected: self.encoders.len(),
                found: row.len(),
            });
        }

        let mut encoded = Vec::with_capacity(self.encoded_width());
        for (encoder, cell) in self.encoders.iter().zip(row) {
            encoder.encode_into(cell, &mut encoded)?;
        }
        Ok(encoded)
    }
}

impl Regressor for PriceModel {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<f64>, InferenceError> {
        if frame.columns() != self.columns.as_slice() {
            return Err(InferenceError::ColumnMismatch {
                expected: self.columns.clone(),
                found: frame.columns().to_vec(),
            });
        }

        frame
            .rows()
            .iter()
            .map(|row| -> Result<f64, InferenceError> {
                let encoded = self.encode_row(row)?;
                Ok(self.estimator.evaluate(&encoded))
            })
            .collect()
    }

    fn summary(&self) -> ModelSummary {
        let trees = self.estimator.trees();
        ModelSummary {
            kind: self.estimator.kind().to_string(),
            version: self.version,
            trees: trees.len(),
            max_depth: trees.iter().map(|t| t.depth()).max().unwrap_or(0),
            target: self.target.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tree::{Node, Tree};
    use crate::models::PropertyType;
    use serde_json::json;

    fn artifact() -> serde_json::Value {
        json!({
            "format": ARTIFACT_FORMAT,
            "version": 1,
            "columns": FeatureRecord::COLUMNS,
            "encoders": [
                {"kind": "numeric", "column": "Landsize"},
                {"kind": "one_hot", "column": "Type", "categories": ["h", "t", "u"]},
                {"kind": "numeric", "column": "Bedroom2"},
                {"kind": "one_hot", "column": "Suburb", "categories": ["Carlton", "Richmond"]},
                {"kind": "numeric", "column": "Car"},
                {"kind": "numeric", "column": "Bathroom"},
                {"kind": "numeric", "column": "BuildingArea"}
            ],
            "estimator": {
                "kind": "random_forest",
                "trees": [
                    {"nodes": [
                        {"kind": "split", "feature": 6, "threshold": 0.5, "left": 1, "right": 2},
                        {"kind": "leaf", "value": 500000.0},
                        {"kind": "leaf", "value": 800000.0}
                    ]}
                ]
            }
        })
    }

    fn record(suburb: &str) -> FeatureRecord {
        FeatureRecord {
            landsize: 300.0,
            property_type: PropertyType::Unit,
            bedroom2: 2,
            suburb: suburb.to_string(),
            car: 1,
            bathroom: 1,
            building_area: 90.0,
        }
    }

    #[test]
    fn decodes_valid_artifact() {
        let model = PriceModel::from_value(artifact()).unwrap();

        assert_eq!(model.target, "Price");
        assert_eq!(model.encoded_width(), 10);
        let summary = model.summary();
        assert_eq!(summary.kind, "random_forest");
        assert_eq!(summary.trees, 1);
        assert_eq!(summary.max_depth, 2);
    }

    #[test]
    fn predicts_through_encoders() {
        let model = PriceModel::from_value(artifact()).unwrap();

        // slot 6 is the Richmond indicator
        let richmond = model.predict(&record("Richmond").to_frame()).unwrap();
        let carlton = model.predict(&record("Carlton").to_frame()).unwrap();
        assert_eq!(richmond, [800_000.0]);
        assert_eq!(carlton, [500_000.0]);
    }

    #[test]
    fn rejects_unknown_format() {
        let mut value = artifact();
        value["format"] = json!("pickle");
        assert!(matches!(
            PriceModel::from_value(value),
            Err(ArtifactLoadError::UnsupportedFormat(f)) if f == "pickle"
        ));
    }

    #[test]
    fn rejects_newer_version() {
        let mut value = artifact();
        value["version"] = json!(2);
        value["estimator"] = json!({"kind": "something_new"});
        assert!(matches!(
            PriceModel::from_value(value),
            Err(ArtifactLoadError::IncompatibleVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn rejects_reordered_columns() {
        let mut value = artifact();
        value["columns"] = json!([
            "Type", "Landsize", "Bedroom2", "Suburb", "Car", "Bathroom", "BuildingArea"
        ]);
        assert!(matches!(
            PriceModel::from_value(value),
            Err(ArtifactLoadError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn rejects_misaligned_encoders() {
        let mut value = artifact();
        value["encoders"][0]["column"] = json!("Rooms");
        assert!(matches!(
            PriceModel::from_value(value),
            Err(ArtifactLoadError::Invalid(msg)) if msg.contains("Rooms")
        ));
    }

    #[test]
    fn rejects_split_beyond_encoded_width() {
        let mut value = artifact();
        value["estimator"]["trees"][0]["nodes"][0]["feature"] = json!(10);
        assert!(matches!(
            PriceModel::from_value(value),
            Err(ArtifactLoadError::Invalid(_))
        ));
    }

    #[test]
    fn load_reports_missing_and_corrupt_files() {
        assert!(matches!(
            PriceModel::load(Path::new("/nonexistent/model.json")),
            Err(ArtifactLoadError::Io { .. })
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PriceModel::load(&path),
            Err(ArtifactLoadError::Corrupt { .. })
        ));
    }

    #[test]
    fn predict_rejects_foreign_columns() {
        let model = PriceModel::from_value(artifact()).unwrap();
        let frame = FeatureFrame::new(vec!["Rooms".into()]);
        assert!(matches!(
            model.predict(&frame),
            Err(InferenceError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn predict_rejects_short_rows() {
        let model = PriceModel::from_value(artifact()).unwrap();
        let mut frame = FeatureFrame::new(model.columns.clone());
        frame.push_row(vec![Cell::Number(1.0)]);
        assert_eq!(
            model.predict(&frame),
            Err(InferenceError::RowWidth {
                expected: 7,
                found: 1
            })
        );
    }

    #[test]
    fn serializes_back_to_loadable_json() {
        let model = PriceModel {
            estimator: Estimator::GradientBoosting {
                init: 900_000.0,
                learning_rate: 0.1,
                trees: vec![Tree::new(vec![Node::leaf(1_000.0)])],
            },
            ..PriceModel::from_value(artifact()).unwrap()
        };
        let value = serde_json::to_value(&model).unwrap();
        let restored = PriceModel::from_value(value).unwrap();

        assert_eq!(restored, model);
        assert_eq!(
            restored.predict(&record("Richmond").to_frame()).unwrap(),
            [900_100.0]
        );
    }
}
