//! Catalog listing and text-model selection.

use crate::core::backend::{BackendError, ModelBackend, RawModel};
use crate::core::util;

/// Substring that marks a generative text model.
pub const TEXT_MODEL_MARKER: &str = "gemini";

/// Substring that marks an embedding-only model.
pub const EMBEDDING_MARKER: &str = "embedding";

/// A model selected for probing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub name: String,
    pub display_name: Option<String>,
    pub input_token_limit: u64,
    pub output_token_limit: u64,
}

/// The catalog could not be listed; the run cannot continue.
#[derive(Debug, thiserror::Error)]
#[error("Could not list models: {source}")]
pub struct CatalogUnavailable {
    #[from]
    pub source: BackendError,
}

/// Whether a catalog name is a text-probing candidate.
pub fn is_text_model(name: &str) -> bool {
    name.contains(TEXT_MODEL_MARKER) && !name.contains(EMBEDDING_MARKER)
}

/// Keep text models in catalog order, defaulting missing limits to 0.
pub fn select_text_models(raw: Vec<RawModel>) -> Vec<ModelDescriptor> {
    raw.into_iter()
        .filter(|m| is_text_model(&m.name))
        .map(|m| ModelDescriptor {
            name: m.name,
            display_name: m.display_name,
            input_token_limit: m.input_token_limit.unwrap_or(0),
            output_token_limit: m.output_token_limit.unwrap_or(0),
        })
        .collect()
}

/// Narrow by case-insensitive query on name or display name. Empty query keeps all.
pub fn filter_models(models: Vec<ModelDescriptor>, query: &str) -> Vec<ModelDescriptor> {
    models
        .into_iter()
        .filter(|m| {
            let display = m.display_name.as_deref().unwrap_or("");
            util::matches_query(query, &m.name, display)
        })
        .collect()
}

/// List the backend catalog and keep the text models.
pub async fn enumerate_text_models<B: ModelBackend>(
    backend: &B,
) -> Result<Vec<ModelDescriptor>, CatalogUnavailable> {
    let raw = backend.list_models().await?;
    let catalog_len = raw.len();
    let models = select_text_models(raw);
    log::debug!(
        "Catalog returned {} model(s), {} selected for probing",
        catalog_len,
        models.len()
    );
    Ok(models)
}
