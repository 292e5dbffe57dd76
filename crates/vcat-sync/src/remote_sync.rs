//! Remote refresh against the live vPIC endpoints.

use vcat_config::RemoteConfig;
use vcat_core::VehicleType;
use vcat_source::{HttpTransport, RemoteClient, SourceError, decode_makes, decode_vehicle_types};
use vcat_store::CatalogStore;

use crate::error::PipelineError;
use crate::resolve::{TypeSource, resolve_all};
use crate::{CatalogPipeline, Origin, RunReport};

/// Per-make vehicle types fetched from the types endpoint.
pub struct RemoteTypes<'a, T> {
    client: &'a RemoteClient<T>,
    endpoints: &'a RemoteConfig,
}

impl<'a, T: HttpTransport> RemoteTypes<'a, T> {
    pub const fn new(client: &'a RemoteClient<T>, endpoints: &'a RemoteConfig) -> Self {
        Self { client, endpoints }
    }
}

impl<T: HttpTransport> TypeSource for RemoteTypes<'_, T> {
    async fn vehicle_types(&self, make_id: &str) -> Result<Vec<VehicleType>, SourceError> {
        let url = self.endpoints.types_url_for(&urlencoding::encode(make_id));
        let raw = self.client.get(&url).await?;
        decode_vehicle_types(&raw)
    }
}

impl<S: CatalogStore, T: HttpTransport> CatalogPipeline<S, T> {
    /// Overwrite the catalog with live upstream data.
    ///
    /// Never fails: if the make list cannot be fetched or decoded, or the
    /// commit fails, the error is logged and the store keeps its previous
    /// catalog. Returns the run summary when a catalog was committed.
    pub async fn sync(&self) -> Option<RunReport> {
        match self.try_sync().await {
            Ok(report) => {
                tracing::info!(
                    makes = report.makes,
                    fallbacks = report.fallbacks,
                    "catalog synced from upstream"
                );
                Some(report)
            }
            Err(error) => {
                tracing::error!(%error, "remote catalog sync failed");
                None
            }
        }
    }

    pub(crate) async fn try_sync(&self) -> Result<RunReport, PipelineError> {
        tracing::info!(url = %self.endpoints.makes_url, "fetching vehicle makes from upstream");
        let raw = self.remote.get(&self.endpoints.makes_url).await?;
        let drafts = decode_makes(&raw)?;
        tracing::info!(count = drafts.len(), "found vehicle makes upstream");

        let types = RemoteTypes::new(&self.remote, &self.endpoints);
        let resolved = resolve_all(drafts, &types, &self.fallback, self.concurrency).await;
        self.commit(Origin::Remote, resolved).await
    }
}
