//! Bundled snapshot loader.

use std::path::{Path, PathBuf};

use vcat_config::DatasetConfig;

use crate::error::SourceError;

/// Reads named snapshot resources from a fixed directory.
///
/// Nothing is cached: every [`load`](Self::load) goes back to disk.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.dir.clone())
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read `resource` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ResourceNotFound`] if the file is missing or
    /// cannot be read as UTF-8.
    pub async fn load(&self, resource: &str) -> Result<String, SourceError> {
        let path = self.dir.join(resource);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::ResourceNotFound {
                resource: resource.to_string(),
                reason: format!("{}: {e}", path.display()),
            })?;
        tracing::debug!(resource, bytes = raw.len(), "snapshot loaded");
        Ok(raw)
    }
}
