//! Catalog store backend selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local catalog, rebuilt on every start.
    #[default]
    Memory,
    /// libSQL database file at [`StoreConfig::path`].
    Libsql,
}

fn default_path() -> PathBuf {
    PathBuf::from(".vcat/catalog.db")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Database file for the libSQL backend. Ignored by the memory backend.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
        }
    }
}
