//! Snapshot bootstrap.
//!
//! The types snapshot is decoded once and every make receives the same list.
//! If it cannot be read or decoded, every make falls back individually.

use std::future::Future;
use std::sync::Arc;

use vcat_core::VehicleType;
use vcat_source::{DatasetLoader, HttpTransport, SourceError, decode_makes, decode_vehicle_types};
use vcat_store::CatalogStore;

use crate::error::PipelineError;
use crate::resolve::{TypeSource, resolve_all};
use crate::supervisor::BackgroundSync;
use crate::{CatalogPipeline, Origin, RunReport};

/// Vehicle types decoded from the bundled snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotTypes {
    decoded: Result<Vec<VehicleType>, SourceError>,
}

impl SnapshotTypes {
    /// Read and decode `resource`. A failure is kept and handed to every make.
    pub async fn load(loader: &DatasetLoader, resource: &str) -> Self {
        let decoded = match loader.load(resource).await {
            Ok(raw) => decode_vehicle_types(&raw),
            Err(error) => Err(error),
        };
        match &decoded {
            Ok(types) => tracing::info!(resource, count = types.len(), "types snapshot decoded"),
            Err(error) => {
                tracing::warn!(resource, %error, "types snapshot unusable, every make falls back");
            }
        }
        Self { decoded }
    }

    pub const fn from_decoded(decoded: Result<Vec<VehicleType>, SourceError>) -> Self {
        Self { decoded }
    }
}

impl TypeSource for SnapshotTypes {
    fn vehicle_types(
        &self,
        _make_id: &str,
    ) -> impl Future<Output = Result<Vec<VehicleType>, SourceError>> + Send {
        std::future::ready(self.decoded.clone())
    }
}

impl<S: CatalogStore, T: HttpTransport> CatalogPipeline<S, T> {
    /// Fill the store from the bundled snapshots.
    ///
    /// Never fails: a makes snapshot that cannot be loaded or decoded, or a
    /// failed commit, is logged and leaves the store as it was. After a
    /// successful commit the remote refresh is spawned and its handle
    /// returned, unless remote sync is disabled.
    pub async fn bootstrap(self: &Arc<Self>) -> Option<BackgroundSync> {
        tracing::info!(dir = %self.loader.dir().display(), "bootstrapping catalog from snapshots");

        match self.try_bootstrap().await {
            Ok(report) => {
                tracing::info!(
                    makes = report.makes,
                    fallbacks = report.fallbacks,
                    "catalog bootstrapped from snapshots"
                );
                if !self.remote_enabled {
                    tracing::info!("remote sync disabled, keeping snapshot catalog");
                    return None;
                }
                let pipeline = Arc::clone(self);
                Some(BackgroundSync::spawn(async move {
                    pipeline.try_sync().await
                }))
            }
            Err(error) => {
                tracing::error!(%error, "catalog bootstrap failed");
                None
            }
        }
    }

    async fn try_bootstrap(&self) -> Result<RunReport, PipelineError> {
        let raw = self.loader.load(&self.dataset.makes_file).await?;
        let drafts = decode_makes(&raw)?;
        tracing::info!(count = drafts.len(), "found vehicle makes in snapshot");

        let types = SnapshotTypes::load(&self.loader, &self.dataset.types_file).await;
        let resolved = resolve_all(drafts, &types, &self.fallback, self.concurrency).await;
        self.commit(Origin::Snapshot, resolved).await
    }
}
