//! Startup configuration for the bainian server.
//!
//! Everything is read once at process start and then handed to the server as
//! an immutable value. See [`AppConfig::from_env`] for the variables consulted.

mod catalog;
mod prompt;

pub use catalog::{ModelCatalog, DEFAULT_MODEL_KEY};
pub use prompt::{DEFAULT_SYSTEM_PROMPT, USER_INSTRUCTION};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_PORT: u16 = 3005;
pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Error
// ─────────────────────────────────────────────────────────────────────────────

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("OPENROUTER_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Unknown default model: {0}")]
    UnknownDefaultModel(String),

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Optional on-disk overrides.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    system_prompt: Option<String>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base: String,
    pub port: u16,
    pub default_model: String,
    pub system_prompt: String,
    pub request_timeout: Duration,
    pub max_tokens: u32,
    pub max_upload_bytes: usize,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("port", &self.port)
            .field("default_model", &self.default_model)
            .field("system_prompt_len", &self.system_prompt.len())
            .field("request_timeout", &self.request_timeout)
            .field("max_tokens", &self.max_tokens)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `OPENROUTER_API_KEY` | required |
    /// | `OPENROUTER_BASE_URL` | `https://openrouter.ai/api/v1` |
    /// | `PORT` | `3005` |
    /// | `DEFAULT_MODEL` | `gemini-flash` |
    /// | `SYSTEM_PROMPT` | built-in prompt |
    /// | `CONFIG_PATH` | `config.json` |
    /// | `REQUEST_TIMEOUT_SECS` | `30` |
    /// | `MAX_TOKENS` | `1024` |
    /// | `MAX_UPLOAD_BYTES` | 10 MiB |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = var("OPENROUTER_API_KEY").ok_or(ConfigError::MissingApiKey)?;
        let api_base = var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();
        let default_model = var("DEFAULT_MODEL").unwrap_or_else(|| DEFAULT_MODEL_KEY.to_string());

        let config_path = var("CONFIG_PATH").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let system_prompt = resolve_system_prompt(Path::new(&config_path), lookup("SYSTEM_PROMPT"))?;

        Ok(Self {
            api_key,
            api_base,
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            default_model,
            system_prompt,
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                DEFAULT_TIMEOUT_SECS,
            )?),
            max_tokens: parse_or("MAX_TOKENS", var("MAX_TOKENS"), DEFAULT_MAX_TOKENS)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", var("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Builds the model catalog with this config's default key.
    pub fn catalog(&self) -> Result<ModelCatalog, ConfigError> {
        ModelCatalog::builtin(&self.default_model)
    }
}

fn parse_or<T: std::str::FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}

/// The config file wins whenever it exists, even without a `system_prompt` key.
fn resolve_system_prompt(path: &Path, env_prompt: Option<String>) -> Result<String, ConfigError> {
    if !path.exists() {
        return Ok(env_prompt
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()));
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: FileConfig = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loaded config file: {}", path.display());
    Ok(file.system_prompt.unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()))
}
