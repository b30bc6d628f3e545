//! Reply generation service.

use bainian_core::{GenerationRequest, ReplySet};
use bainian_llm::generate_reply_set;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

/// Resolves the model leniently and runs one provider call for the request.
pub async fn generate(state: &AppState, request: &GenerationRequest) -> Result<ReplySet, AppError> {
    let profile = state.catalog.resolve(request.model_key.as_deref());

    if let Some(key) = request.model_key.as_deref().filter(|k| *k != profile.key) {
        info!("Unknown model '{}', using default '{}'", key, profile.key);
    }

    let replies = generate_reply_set(
        state.provider.as_ref(),
        profile,
        &state.config.system_prompt,
        &request.image,
    )
    .await?;

    Ok(replies)
}
