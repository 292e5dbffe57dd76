//! Background task running the remote refresh after bootstrap.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::RunReport;
use crate::error::PipelineError;

/// Handle to a spawned pipeline run.
///
/// The task logs its own outcome, so dropping the handle is fine. A panic
/// inside the run stays on the task and is reported by [`Self::join`].
pub struct BackgroundSync {
    handle: JoinHandle<Option<RunReport>>,
}

impl BackgroundSync {
    pub fn spawn<F>(run: F) -> Self
    where
        F: Future<Output = Result<RunReport, PipelineError>> + Send + 'static,
    {
        let task = async move {
            tracing::info!("background catalog sync started");
            match run.await {
                Ok(report) => {
                    tracing::info!(
                        origin = %report.origin,
                        makes = report.makes,
                        fallbacks = report.fallbacks,
                        "background catalog sync finished"
                    );
                    Some(report)
                }
                Err(error) => {
                    tracing::error!(%error, "background catalog sync failed");
                    None
                }
            }
        };
        Self {
            handle: tokio::spawn(task.instrument(tracing::info_span!("background_sync"))),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the run. `None` when it failed, panicked or was aborted.
    pub async fn join(self) -> Option<RunReport> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(error) if error.is_panic() => {
                tracing::error!(%error, "background catalog sync panicked");
                None
            }
            Err(_) => {
                tracing::warn!("background catalog sync cancelled");
                None
            }
        }
    }
}
