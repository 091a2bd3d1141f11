pub mod args;
pub mod op;
pub mod ops;

use clap::Subcommand;

use op::{Op, OpContext};
use ops::daemon::DaemonError;
use ops::init::InitError;
use ops::version::VersionError;
pub use ops::{Daemon, Init, Version};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the wire server
    Daemon(Daemon),
    /// Create the config directory and a default config
    Init(Init),
    /// Print build version information
    Version(Version),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Daemon(#[from] DaemonError),
    #[error(transparent)]
    Init(#[from] InitError),
    #[error(transparent)]
    Version(#[from] VersionError),
}

#[async_trait::async_trait]
impl Op for Command {
    type Error = CommandError;
    type Output = String;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error> {
        match self {
            Command::Daemon(op) => Ok(op.execute(ctx).await?),
            Command::Init(op) => Ok(op.execute(ctx).await?),
            Command::Version(op) => Ok(op.execute(ctx).await?),
        }
    }
}
