//! Pipeline scheduling configuration.

use serde::{Deserialize, Serialize};

const fn default_remote_enabled() -> bool {
    true
}

const fn default_concurrency() -> usize {
    16
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Whether a successful bootstrap schedules the one-shot remote refresh.
    #[serde(default = "default_remote_enabled")]
    pub remote_enabled: bool,

    /// Maximum number of makes whose vehicle types are resolved at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            remote_enabled: default_remote_enabled(),
            concurrency: default_concurrency(),
        }
    }
}
