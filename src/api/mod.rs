mod form;
mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::PredictionService;

/// Shared, read-only service handle passed to every handler.
pub type AppState = Arc<PredictionService>;

pub fn create_router(service: AppState) -> Router {
    let api = Router::new()
        .route("/suburbs", get(handlers::list_suburbs))
        .route("/model", get(handlers::model_info))
        .route("/predict", post(handlers::predict))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .route("/", get(handlers::show_form).post(handlers::submit_form))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
