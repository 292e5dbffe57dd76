//! Per-make vehicle type resolution.
//!
//! Every make is resolved concurrently and independently: an error for one
//! make is logged and replaced by its [`FallbackTable`] entry without
//! touching its siblings. The join waits for all of them and keeps the input
//! order.

use std::future::Future;

use futures::future::join_all;
use tokio::sync::Semaphore;
use vcat_core::{FallbackTable, Make, VehicleType};
use vcat_source::{MakeRecord, SourceError};

/// Where a make's vehicle types come from.
pub trait TypeSource: Send + Sync {
    fn vehicle_types(
        &self,
        make_id: &str,
    ) -> impl Future<Output = Result<Vec<VehicleType>, SourceError>> + Send;
}

/// A make with its vehicle types settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMake {
    pub make: Make,
    /// `true` when the types came from the fallback table.
    pub fell_back: bool,
}

/// Resolve every draft against `source`, at most `concurrency` at a time.
pub async fn resolve_all<S: TypeSource>(
    drafts: Vec<MakeRecord>,
    source: &S,
    fallback: &FallbackTable,
    concurrency: usize,
) -> Vec<ResolvedMake> {
    let permits = Semaphore::new(concurrency.max(1));
    let mut tasks = Vec::with_capacity(drafts.len());
    for draft in drafts {
        tasks.push(resolve_one(draft, source, fallback, &permits));
    }
    join_all(tasks).await
}

async fn resolve_one<S: TypeSource>(
    draft: MakeRecord,
    source: &S,
    fallback: &FallbackTable,
    permits: &Semaphore,
) -> ResolvedMake {
    let _permit = permits.acquire().await.ok();

    match source.vehicle_types(&draft.make_id).await {
        Ok(vehicle_types) => {
            tracing::debug!(
                make_id = %draft.make_id,
                count = vehicle_types.len(),
                "resolved vehicle types"
            );
            ResolvedMake {
                make: draft.into_make(vehicle_types),
                fell_back: false,
            }
        }
        Err(error) => {
            let vehicle_types = fallback.lookup(&draft.make_id);
            tracing::warn!(
                make_id = %draft.make_id,
                make_name = %draft.make_name,
                %error,
                fallback_types = vehicle_types.len(),
                "vehicle type resolution failed, using fallback table"
            );
            ResolvedMake {
                make: draft.into_make(vehicle_types),
                fell_back: true,
            }
        }
    }
}
