//! Screenshot upload handler.

use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use bainian_core::{GenerationRequest, ImagePayload, MediaType, ReplySet};
use tracing::{debug, error, warn};

use crate::error::AppError;
use crate::services::generate as generate_service;
use crate::state::AppState;

pub const MISSING_IMAGE: &str = "请上传图片";

/// POST /api/generate - Multipart `image` (required) and `model` (optional).
pub async fn generate(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReplySet>, AppError> {
    // A body that is not multipart cannot carry an image either.
    let multipart = multipart.map_err(|e| {
        warn!("Rejected non-multipart upload: {}", e);
        AppError::BadRequest(MISSING_IMAGE.into())
    })?;
    let request = read_request(multipart, state.config.max_upload_bytes).await?;

    let replies = generate_service::generate(&state, &request).await.map_err(|e| {
        error!("Failed to generate replies: {:?}", e);
        e
    })?;

    Ok(Json(replies))
}

/// Maps a multipart read failure, keeping the body-limit case distinct.
fn upload_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload exceeded {} bytes", limit);
        return AppError::PayloadTooLarge(format!("图片过大，上限 {} 字节", limit));
    }
    AppError::BadRequest(format!("Multipart error: {}", e))
}

async fn read_request(mut multipart: Multipart, limit: usize) -> Result<GenerationRequest, AppError> {
    let mut image: Option<ImagePayload> = None;
    let mut model_key: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, limit))?
    {
        let field_name = field.name().map(|n| n.to_string());
        match field_name.as_deref() {
            Some("image") => {
                let media_type = MediaType::from_declared(field.content_type());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(e, limit))?;
                debug!("Received image: {} bytes as {}", bytes.len(), media_type.as_mime());
                image = Some(ImagePayload::new(bytes.to_vec(), media_type));
            }
            Some("model") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| upload_error(e, limit))?;
                let value = value.trim();
                model_key = (!value.is_empty()).then(|| value.to_string());
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| AppError::BadRequest(MISSING_IMAGE.into()))?;
    Ok(GenerationRequest { image, model_key })
}
