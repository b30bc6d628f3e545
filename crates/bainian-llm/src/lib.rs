//! Vision model provider boundary for bainian.
//!
//! - [`VisionProvider`] — Sends one screenshot plus instructions, returns raw completion text
//! - [`OpenRouterClient`] — HTTP implementation against an OpenAI-compatible API
//! - [`normalize_completion`] — Fence stripping and JSON parsing of completions
//! - [`generate_reply_set`] — The full call: provider, normalization, validation

mod client;
mod normalize;

pub use client::OpenRouterClient;
pub use normalize::{normalize_completion, strip_code_fence};

use std::time::Instant;

use async_trait::async_trait;
use bainian_core::{ImagePayload, ModelProfile, ReplyError, ReplySet};
use tracing::{info, warn};

/// A hosted multimodal model that completes a system prompt plus one image.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Returns the raw completion text for `image` under `system_prompt`.
    async fn complete(&self, model: &str, system_prompt: &str, image: &ImagePayload) -> Result<String, ReplyError>;
}

/// Runs one generate call end to end. No retries and no fallback model.
pub async fn generate_reply_set(
    provider: &dyn VisionProvider,
    profile: &ModelProfile,
    system_prompt: &str,
    image: &ImagePayload,
) -> Result<ReplySet, ReplyError> {
    let start = Instant::now();

    let completion = provider.complete(&profile.model, system_prompt, image).await?;
    let value = normalize_completion(&completion)
        .inspect_err(|e| warn!("Unparseable completion from {}: {}", profile.key, e))?;
    let replies =
        ReplySet::from_value(value).inspect_err(|e| warn!("Rejected completion from {}: {}", profile.key, e))?;

    info!(
        model = %profile.model,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "generated reply set"
    );
    Ok(replies)
}
