//! Pipeline error types.

use thiserror::Error;
use vcat_source::SourceError;
use vcat_store::StoreError;

/// Why a pipeline run was aborted.
///
/// Only the internal run functions return this; the public entry points log
/// it and carry on.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The make list could not be loaded, fetched or decoded.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Committing the resolved catalog failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
