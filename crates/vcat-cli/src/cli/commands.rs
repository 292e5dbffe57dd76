use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Rebuild the catalog from the bundled snapshots, then from upstream
    Refresh(RefreshArgs),

    /// Query the committed catalog
    Makes {
        #[command(subcommand)]
        action: MakesCommands,
    },
}

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Skip the upstream sync and keep the snapshot catalog
    #[arg(long)]
    pub offline: bool,
}

#[derive(Debug, Subcommand)]
pub enum MakesCommands {
    /// List every make with its vehicle types
    List,

    /// Show a single make
    Get {
        /// vPIC make id, e.g. 448
        make_id: String,
    },
}
