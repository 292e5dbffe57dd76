use crate::cli::{GlobalFlags, MakesCommands};
use crate::context::AppContext;
use crate::output::output;

/// Handle `vcat makes` subcommands.
pub async fn handle(action: &MakesCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.ensure_catalog().await?;
    let service = ctx.service();

    match action {
        MakesCommands::List => {
            let makes = service.get_all_makes().await?;
            output(&makes, flags.format)
        }
        MakesCommands::Get { make_id } => {
            let Some(make) = service.get_make_by_id(make_id).await? else {
                anyhow::bail!("vehicle make '{make_id}' not found");
            };
            output(&make, flags.format)
        }
    }
}
