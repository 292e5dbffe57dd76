use clap::Parser;

pub mod commands;
pub mod global;

pub use commands::{Commands, MakesCommands, RefreshArgs};
pub use global::{GlobalFlags, OutputFormat};

/// Top-level CLI parser for the `vcat` binary.
#[derive(Debug, Parser)]
#[command(name = "vcat", version, about = "vcat - vehicle make and type catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
