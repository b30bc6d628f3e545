use std::sync::Arc;

use axum::{extract::State, Json};

use crate::dto::ModelsResponse;
use crate::state::AppState;

/// GET /api/models - Selectable models and the default key.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse::from(&state.catalog))
}
