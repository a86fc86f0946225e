//! Template storage backends.

use std::path::PathBuf;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{TemplateError, TemplateResult};

/// Key-value store the renderer reads raw template text from.
///
/// Reading is the only operation in scope; authoring templates is an
/// out-of-band concern of whoever owns the backing storage.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetch the raw template text for `key`.
    ///
    /// Fails with [`TemplateError::NotFound`] when the key has no backing
    /// resource.
    async fn get(&self, key: &str) -> TemplateResult<String>;
}

/// Keys double as file names, so confine them to a safe charset.
fn validate_key(key: &str) -> TemplateResult<()> {
    if key.is_empty() || key.len() > 128 {
        return Err(TemplateError::InvalidKey(
            "key must be 1-128 characters".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(TemplateError::InvalidKey(
            "key must contain only alphanumeric, dash, underscore, or dot".to_string(),
        ));
    }

    Ok(())
}

/// Filesystem-backed store: one template file per key under a root directory.
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn get(&self, key: &str) -> TemplateResult<String> {
        validate_key(key)?;

        let path = self.root.join(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TemplateError::NotFound(key.to_string()))
            }
            Err(e) => Err(TemplateError::Storage(e.to_string())),
        }
    }
}

/// In-memory template storage
pub struct MemoryTemplateStore {
    templates: DashMap<String, String>,
}

impl Default for MemoryTemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Insert or replace a template
    pub fn insert(&self, key: impl Into<String>, text: impl Into<String>) {
        self.templates.insert(key.into(), text.into());
    }

    /// Get the number of stored templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn get(&self, key: &str) -> TemplateResult<String> {
        validate_key(key)?;

        self.templates
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get() {
        let store = MemoryTemplateStore::new();
        store.insert("welcome", "Hello {FirstName}");

        let text = store.get("welcome").await.unwrap();
        assert_eq!(text, "Hello {FirstName}");
    }

    #[tokio::test]
    async fn test_memory_store_missing_key() {
        let store = MemoryTemplateStore::new();
        assert!(matches!(
            store.get("missing").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_fs_store_missing_file() {
        let store = FsTemplateStore::new("does/not/exist");
        assert!(matches!(
            store.get("welcome.html").await,
            Err(TemplateError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_key_rejects_path_traversal() {
        let store = FsTemplateStore::new("templates");
        assert!(matches!(
            store.get("../etc/passwd").await,
            Err(TemplateError::InvalidKey(_))
        ));
        assert!(matches!(
            store.get("").await,
            Err(TemplateError::InvalidKey(_))
        ));
    }
}
