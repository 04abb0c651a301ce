//! Domain models for propval.
//!
//! - [`FeatureRecord`]: the seven inputs describing one property, in the
//!   column order the price model was trained on.
//! - [`FeatureFrame`]: the table shape handed to a model at inference time.
//! - [`PredictionResponse`] and [`ModelInfo`]: what the API returns.

mod feature;
mod frame;
mod prediction;

pub use feature::*;
pub use frame::*;
pub use prediction::*;
