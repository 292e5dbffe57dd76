//! # vcat-config
//!
//! Layered configuration loading for vcat using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VCAT_*` prefix, `__` as separator)
//! 2. Legacy upstream variables `GET_MAKES_URL` and `GET_VEHICLE_TYPES_URL`
//! 3. Project-level `vcat.toml`
//! 4. User-level `~/.config/vcat/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VCAT_REMOTE__MAKES_URL` -> `remote.makes_url`,
//! `VCAT_STORE__BACKEND` -> `store.backend`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use vcat_config::VcatConfig;
//!
//! let config = VcatConfig::load_with_dotenv().expect("config");
//! println!("makes endpoint: {}", config.remote.makes_url);
//! ```

mod dataset;
mod error;
mod remote;
mod store;
mod sync;

pub use dataset::DatasetConfig;
pub use error::ConfigError;
pub use remote::{RemoteConfig, RetryConfig};
pub use store::{StoreBackend, StoreConfig};
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variables read by earlier deployments of the catalog service.
const LEGACY_URL_VARS: [&str; 2] = ["GET_MAKES_URL", "GET_VEHICLE_TYPES_URL"];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VcatConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl VcatConfig {
    /// Load and validate configuration from all sources.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source cannot be parsed or a value fails
    /// validation.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("vcat.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment = figment.merge(Env::raw().only(&LEGACY_URL_VARS).map(|key| {
            if key.as_str().eq_ignore_ascii_case("GET_MAKES_URL") {
                "remote.makes_url".into()
            } else {
                "remote.types_url".into()
            }
        }));

        figment.merge(Env::prefixed("VCAT_").split("__"))
    }

    /// Reject values the pipelines cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.makes_url.trim().is_empty() {
            return Err(invalid("remote.makes_url", "must not be empty"));
        }
        if self.remote.types_url.trim().is_empty() {
            return Err(invalid("remote.types_url", "must not be empty"));
        }
        if self.remote.retry.max_attempts == 0 {
            return Err(invalid("remote.retry.max_attempts", "must be at least 1"));
        }
        if self.sync.concurrency == 0 {
            return Err(invalid("sync.concurrency", "must be at least 1"));
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vcat").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
