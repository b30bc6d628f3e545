//! Static table of selectable vision models.

use bainian_core::ModelProfile;

use crate::ConfigError;

/// Selector key used when `DEFAULT_MODEL` is not set.
pub const DEFAULT_MODEL_KEY: &str = "gemini-flash";

const BUILTIN_MODELS: &[(&str, &str, &str)] = &[
    ("gemini-flash", "🌟 Gemini Flash", "google/gemini-2.0-flash-001"),
    ("qwen-vl-72b", "🇨🇳 通义千问 VL", "qwen/qwen2.5-vl-72b-instruct"),
    ("claude-sonnet", "🤖 Claude Sonnet", "anthropic/claude-sonnet-4-5"),
    ("deepseek", "🔥 DeepSeek V3", "deepseek/deepseek-chat-v3-0324"),
];

/// Immutable model table with a resolved default entry.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    profiles: Vec<ModelProfile>,
    default_index: usize,
}

impl ModelCatalog {
    /// Builds the built-in catalog with `default_key` as the fallback profile.
    pub fn builtin(default_key: &str) -> Result<Self, ConfigError> {
        let profiles = BUILTIN_MODELS
            .iter()
            .map(|(key, label, model)| ModelProfile {
                key: key.to_string(),
                label: label.to_string(),
                model: model.to_string(),
            })
            .collect();
        Self::new(profiles, default_key)
    }

    pub fn new(profiles: Vec<ModelProfile>, default_key: &str) -> Result<Self, ConfigError> {
        let default_index = profiles
            .iter()
            .position(|p| p.key == default_key)
            .ok_or_else(|| ConfigError::UnknownDefaultModel(default_key.to_string()))?;

        Ok(Self { profiles, default_index })
    }

    /// Strict lookup by selector key.
    pub fn get(&self, key: &str) -> Option<&ModelProfile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    /// Lenient lookup: absent or unknown keys fall back to the default profile.
    pub fn resolve(&self, key: Option<&str>) -> &ModelProfile {
        key.and_then(|k| self.get(k)).unwrap_or_else(|| self.default_profile())
    }

    pub fn default_profile(&self) -> &ModelProfile {
        &self.profiles[self.default_index]
    }

    pub fn profiles(&self) -> &[ModelProfile] {
        &self.profiles
    }
}
