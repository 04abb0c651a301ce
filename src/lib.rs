//! Property price prediction backed by a pre-trained tree ensemble.
//!
//! [`PredictionService`] loads a model artifact and the reference dataset
//! once, then answers single-record price predictions. The [`api`] module
//! serves it as an HTML form and a JSON API; [`client`] talks to a running
//! server.

pub mod api;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod model;
pub mod models;
pub mod service;

pub use error::{Error, Result};
pub use service::PredictionService;
