use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Args;

use stash_daemon::service_state::StateSetupError;
use stash_daemon::state::{AppState, StateError};
use stash_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override wire server port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("service error: {0}")]
    Service(#[from] StateSetupError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;
        let port = self.port.unwrap_or(state.config.port);

        let config = ServiceConfig {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), port),
            max_connections: state.config.max_connections,
            require_auth: state.config.require_auth,
            parent_at_root: state.config.parent_at_root.into(),
            sqlite_path: Some(state.db_path),
            log_level: tracing::Level::INFO,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
