//! HTTP route handlers for the reply server.

pub mod generate;
pub mod models;

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Health check endpoint.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        default_model: state.config.default_model.clone(),
    })
}
