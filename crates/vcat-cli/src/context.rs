//! Shared state for command handlers.

use std::sync::Arc;

use anyhow::Context;
use vcat_config::VcatConfig;
use vcat_store::{CatalogBackend, CatalogService};
use vcat_sync::CatalogPipeline;

pub struct AppContext {
    pub config: VcatConfig,
    pub store: Arc<CatalogBackend>,
}

impl AppContext {
    /// Open the configured catalog store.
    pub async fn init(config: VcatConfig) -> anyhow::Result<Self> {
        let store = CatalogBackend::open(&config.store)
            .await
            .with_context(|| {
                format!(
                    "failed to open {:?} catalog store at {}",
                    config.store.backend,
                    config.store.path.display()
                )
            })?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    /// Pipeline over the shared store. `remote_sync` is ANDed with the
    /// configured `sync.remote_enabled`.
    pub fn pipeline(&self, remote_sync: bool) -> anyhow::Result<Arc<CatalogPipeline<CatalogBackend>>> {
        let pipeline = CatalogPipeline::from_config(&self.config, Arc::clone(&self.store))
            .context("failed to build upstream HTTP client")?
            .with_remote_sync(remote_sync && self.config.sync.remote_enabled);
        Ok(Arc::new(pipeline))
    }

    pub fn service(&self) -> CatalogService<CatalogBackend> {
        CatalogService::new(Arc::clone(&self.store))
    }

    /// A memory store starts empty on every run, so fill it from the
    /// snapshots before answering queries.
    pub async fn ensure_catalog(&self) -> anyhow::Result<()> {
        if !self.store.is_persistent() {
            tracing::debug!("memory backend, bootstrapping catalog from snapshots");
            self.pipeline(false)?.bootstrap().await;
        }
        Ok(())
    }
}
