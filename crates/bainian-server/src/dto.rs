use bainian_config::ModelCatalog;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub default_model: String,
}

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

impl From<&ModelCatalog> for ModelsResponse {
    fn from(catalog: &ModelCatalog) -> Self {
        Self {
            models: catalog
                .profiles()
                .iter()
                .map(|p| ModelInfo {
                    key: p.key.clone(),
                    label: p.label.clone(),
                })
                .collect(),
            default: catalog.default_profile().key.clone(),
        }
    }
}
