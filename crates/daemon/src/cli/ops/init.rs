use clap::Args;

use stash_daemon::state::{AppConfig, AppState, ParentAtRootSetting};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Wire server port to record in the new config
    #[arg(long)]
    pub port: Option<u16>,

    /// Require login before filesystem commands
    #[arg(long)]
    pub require_auth: bool,

    /// Answer `cd ..` at the root with not found instead of staying put
    #[arg(long)]
    pub deny_parent_at_root: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("state error: {0}")]
    StateError(#[from] stash_daemon::state::StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut config = AppConfig::default();
        if let Some(port) = self.port {
            config.port = port;
        }
        config.require_auth = self.require_auth;
        if self.deny_parent_at_root {
            config.parent_at_root = ParentAtRootSetting::Deny;
        }

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        Ok(format!(
            "initialized stash directory at {}",
            state.stash_dir.display()
        ))
    }
}
