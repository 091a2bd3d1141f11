use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "stash")]
#[command(about = "Multi-user virtual filesystem daemon")]
pub struct Args {
    /// Path to the stash config directory (defaults to ~/.stash)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: super::Command,
}
