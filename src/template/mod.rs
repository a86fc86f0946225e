//! Message templates.
//!
//! Templates are externally stored text/HTML blobs with `{Token}`
//! placeholders, read fresh on every dispatch through the [`TemplateStore`]
//! trait and rendered by [`TemplateRenderer`]. Callers that want to send
//! raw content verbatim keep a pass-through template consisting of a single
//! token and supply the content as that token's value.

mod render;
mod store;

use std::sync::Arc;

use thiserror::Error;

use crate::config::TemplateConfig;

pub use render::{substitute_tokens, TemplateRenderer};
pub use store::{FsTemplateStore, MemoryTemplateStore, TemplateStore};

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("invalid template key: {0}")]
    InvalidKey(String),

    #[error("template store error: {0}")]
    Storage(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Create a template store based on configuration.
///
/// Returns the backend selected by the `backend` setting:
/// - `"memory"`: an empty in-memory store (tests, ephemeral setups)
/// - `"fs"` (default): one file per key under `templates.dir`
pub fn create_template_store(settings: &TemplateConfig) -> Arc<dyn TemplateStore> {
    match settings.backend.as_str() {
        "memory" => {
            tracing::info!(backend = "memory", "Creating in-memory template store");
            Arc::new(MemoryTemplateStore::new())
        }
        _ => {
            tracing::info!(backend = "fs", dir = %settings.dir, "Creating filesystem template store");
            Arc::new(FsTemplateStore::new(&settings.dir))
        }
    }
}
