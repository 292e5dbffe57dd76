//! # vcat-sync
//!
//! The two ingestion pipelines that fill the catalog store.
//!
//! 1. [`CatalogPipeline::bootstrap`] loads the bundled XML snapshots, resolves
//!    vehicle types per make and commits the result. On success it schedules
//!    the remote refresh on a background task.
//! 2. [`CatalogPipeline::sync`] does the same against the live vPIC
//!    endpoints and overwrites the snapshot catalog.
//!
//! Neither entry point returns an error. Failures are logged and leave the
//! previously committed catalog in place.

pub mod bootstrap;
pub mod error;
pub mod remote_sync;
pub mod resolve;
pub mod supervisor;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use vcat_config::{DatasetConfig, RemoteConfig, VcatConfig};
use vcat_core::{FallbackTable, Make};
use vcat_source::{DatasetLoader, HttpTransport, RemoteClient, SourceError};
use vcat_store::CatalogStore;

pub use bootstrap::SnapshotTypes;
pub use error::PipelineError;
pub use remote_sync::RemoteTypes;
pub use resolve::{ResolvedMake, TypeSource, resolve_all};
pub use supervisor::BackgroundSync;

/// Which pipeline produced a committed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Snapshot,
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => f.write_str("snapshot"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Summary of a committed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub origin: Origin,
    /// Makes written to the store.
    pub makes: usize,
    /// Makes whose vehicle types came from the fallback table.
    pub fallbacks: usize,
}

/// Snapshot bootstrap and remote refresh over one catalog store.
pub struct CatalogPipeline<S, T = reqwest::Client> {
    store: Arc<S>,
    loader: DatasetLoader,
    dataset: DatasetConfig,
    remote: RemoteClient<T>,
    endpoints: RemoteConfig,
    fallback: FallbackTable,
    concurrency: usize,
    remote_enabled: bool,
}

impl<S: CatalogStore> CatalogPipeline<S> {
    /// Build a pipeline with a reqwest client and every setting taken from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the HTTP client cannot be built.
    pub fn from_config(config: &VcatConfig, store: Arc<S>) -> Result<Self, SourceError> {
        let remote = RemoteClient::from_config(&config.remote)?;
        Ok(
            Self::new(store, DatasetLoader::from_config(&config.dataset), remote)
                .with_dataset(config.dataset.clone())
                .with_endpoints(config.remote.clone())
                .with_concurrency(config.sync.concurrency)
                .with_remote_sync(config.sync.remote_enabled),
        )
    }
}

impl<S: CatalogStore, T: HttpTransport> CatalogPipeline<S, T> {
    /// A pipeline with default file names, endpoints and concurrency, the
    /// built-in fallback table and remote sync enabled.
    pub fn new(store: Arc<S>, loader: DatasetLoader, remote: RemoteClient<T>) -> Self {
        Self {
            store,
            loader,
            dataset: DatasetConfig::default(),
            remote,
            endpoints: RemoteConfig::default(),
            fallback: FallbackTable::builtin(),
            concurrency: vcat_config::SyncConfig::default().concurrency,
            remote_enabled: true,
        }
    }

    /// Snapshot file names. The directory comes from the loader.
    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetConfig) -> Self {
        self.dataset = dataset;
        self
    }

    #[must_use]
    pub fn with_endpoints(mut self, endpoints: RemoteConfig) -> Self {
        self.endpoints = endpoints;
        self
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackTable) -> Self {
        self.fallback = fallback;
        self
    }

    /// Maximum number of makes resolved at once. Zero is treated as one.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Whether a successful bootstrap schedules the remote refresh.
    #[must_use]
    pub const fn with_remote_sync(mut self, enabled: bool) -> Self {
        self.remote_enabled = enabled;
        self
    }

    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub const fn remote(&self) -> &RemoteClient<T> {
        &self.remote
    }

    /// Replace the store's catalog with `resolved`.
    async fn commit(
        &self,
        origin: Origin,
        resolved: Vec<ResolvedMake>,
    ) -> Result<RunReport, PipelineError> {
        let fallbacks = resolved.iter().filter(|r| r.fell_back).count();
        let makes: Vec<Make> = resolved.into_iter().map(|r| r.make).collect();
        let report = RunReport {
            origin,
            makes: makes.len(),
            fallbacks,
        };

        tracing::info!(%origin, makes = report.makes, fallbacks, "saving resolved catalog");
        self.store.replace_all(makes).await?;
        Ok(report)
    }
}
