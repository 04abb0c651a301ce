//! The prediction service: one loaded model plus the suburbs it knows about.

use std::path::Path;

use chrono::Utc;

use crate::dataset::KnownSuburbs;
use crate::error::{InferenceError, Result};
use crate::model::{PriceModel, Regressor};
use crate::models::{FeatureRecord, ModelInfo};

/// Wraps a pre-trained regressor and exposes single-record prediction.
///
/// The service is immutable once constructed. Share it behind an `Arc`;
/// every method takes `&self` and no state is written after startup.
pub struct PredictionService {
    model: Box<dyn Regressor>,
    suburbs: KnownSuburbs,
    info: ModelInfo,
    strict: bool,
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("info", &self.info)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

impl PredictionService {
    /// Load the model artifact and the reference dataset.
    ///
    /// Fails with [`ArtifactLoadError`](crate::error::ArtifactLoadError) or
    /// [`DatasetLoadError`](crate::error::DatasetLoadError); no service is
    /// produced in either case.
    pub fn initialize(model_path: &Path, dataset_path: &Path) -> Result<Self> {
        let model = PriceModel::load(model_path)?;
        let suburbs = KnownSuburbs::load(dataset_path)?;

        let mut service = Self::from_parts(Box::new(model), suburbs);
        service.info.source = Some(model_path.display().to_string());

        tracing::info!(
            "Loaded {} ({} trees) with {} known suburbs",
            service.info.summary.kind,
            service.info.summary.trees,
            service.info.known_suburbs
        );
        Ok(service)
    }

    /// Build a service around an already-loaded regressor.
    pub fn from_parts(model: Box<dyn Regressor>, suburbs: KnownSuburbs) -> Self {
        let info = ModelInfo {
            summary: model.summary(),
            columns: model.columns().to_vec(),
            source: None,
            known_suburbs: suburbs.len(),
            loaded_at: Utc::now(),
        };
        Self {
            model,
            suburbs,
            info,
            strict: true,
        }
    }

    /// Whether records are validated before inference. On by default.
    ///
    /// When off, violations are logged and the record goes to the model as is.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Predict the price of one property.
    pub fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        if let Err(e) = record.validate(&self.suburbs) {
            if self.strict {
                return Err(e.into());
            }
            tracing::warn!("Passing unvalidated record to model: {}", e);
        }

        let frame = record.to_frame();
        let predictions = self.model.predict(&frame)?;
        let price = predictions
            .first()
            .copied()
            .ok_or(InferenceError::EmptyOutput)?;

        if !price.is_finite() {
            return Err(InferenceError::NonFinite(price).into());
        }

        tracing::debug!(
            suburb = %record.suburb,
            property_type = %record.property_type,
            price,
            "Predicted price"
        );
        Ok(price)
    }

    /// Known suburbs in sorted order.
    pub fn list_known_suburbs(&self) -> &[String] {
        self.suburbs.as_slice()
    }

    pub fn known_suburbs(&self) -> &KnownSuburbs {
        &self.suburbs
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }
}
