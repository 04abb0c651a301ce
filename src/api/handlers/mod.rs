use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Form, Json,
};
use serde::Deserialize;

use super::form::{render_form, FormView, Outcome};
use super::AppState;
use crate::error::Error;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map a prediction error to a response.
///
/// Invalid records are the caller's fault and their message is returned
/// as-is. Anything else is logged server-side and the client only sees a
/// generic message.
fn prediction_error(e: Error) -> (StatusCode, String) {
    if e.is_client_error() {
        tracing::warn!("Rejected record: {}", e);
        return (StatusCode::BAD_REQUEST, e.to_string());
    }

    tracing::error!("Prediction failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// JSON API
// ============================================================

pub async fn list_suburbs(State(service): State<AppState>) -> Json<Vec<String>> {
    Json(service.list_known_suburbs().to_vec())
}

pub async fn model_info(State(service): State<AppState>) -> Json<ModelInfo> {
    Json(service.model_info().clone())
}

pub async fn predict(
    State(service): State<AppState>,
    Json(record): Json<FeatureRecord>,
) -> Result<Json<PredictionResponse>, (StatusCode, String)> {
    service
        .predict(&record)
        .map(|price| Json(PredictionResponse::from_price(price)))
        .map_err(prediction_error)
}

// ============================================================
// Interactive Form
// ============================================================

/// Fields posted by the HTML form.
///
/// Counts arrive as numbers and are clamped and rounded like the sizes.
#[derive(Debug, Clone, Deserialize)]
pub struct FormInput {
    pub landsize: f64,
    pub building_area: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub car: f64,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub suburb: String,
}

impl FormInput {
    pub fn into_record(self) -> FeatureRecord {
        FeatureRecord {
            landsize: self.landsize,
            property_type: self.property_type,
            bedroom2: form_count(self.bedrooms),
            suburb: self.suburb,
            car: form_count(self.car),
            bathroom: form_count(self.bathrooms),
            building_area: self.building_area,
        }
        .clamp()
    }
}

fn form_count(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    ROOM_BOUNDS.clamp(value).round() as u32
}

pub async fn show_form(State(service): State<AppState>) -> Html<String> {
    let record = FeatureRecord::form_defaults(
        service
            .known_suburbs()
            .default_selection()
            .unwrap_or_default(),
    );

    Html(render_form(&FormView {
        record: &record,
        suburbs: service.list_known_suburbs(),
        info: service.model_info(),
        outcome: None,
    }))
}

pub async fn submit_form(
    State(service): State<AppState>,
    Form(input): Form<FormInput>,
) -> Html<String> {
    let record = input.into_record();

    let outcome = match service.predict(&record) {
        Ok(price) => Outcome::Price(price),
        Err(e) => {
            let (_, message) = prediction_error(e);
            Outcome::Error(message)
        }
    };

    Html(render_form(&FormView {
        record: &record,
        suburbs: service.list_known_suburbs(),
        info: service.model_info(),
        outcome: Some(outcome),
    }))
}
