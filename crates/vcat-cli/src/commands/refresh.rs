use serde::Serialize;
use vcat_store::CatalogStore;
use vcat_sync::RunReport;

use crate::cli::{GlobalFlags, RefreshArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct RefreshResponse {
    persistent: bool,
    makes: usize,
    /// Outcome of the upstream sync. `None` when it was skipped or failed.
    remote: Option<RunReport>,
}

/// Handle `vcat refresh`.
pub async fn handle(args: &RefreshArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let pipeline = ctx.pipeline(!args.offline)?;

    let remote = match pipeline.bootstrap().await {
        Some(background) => background.join().await,
        None => None,
    };

    let makes = ctx.store.find_all().await?.len();
    output(
        &RefreshResponse {
            persistent: ctx.store.is_persistent(),
            makes,
            remote,
        },
        flags.format,
    )
}
