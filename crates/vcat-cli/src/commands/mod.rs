use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

pub mod makes;
pub mod refresh;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Refresh(args) => refresh::handle(&args, ctx, flags).await,
        Commands::Makes { action } => makes::handle(&action, ctx, flags).await,
    }
}
