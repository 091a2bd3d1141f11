pub mod utils;

use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::service_state::StateSetupError;
use crate::wire_server;
use crate::{ServiceConfig, ServiceState};

/// How long live connections get after the shutdown signal before the
/// process stops waiting for them.
const DRAIN_DEADLINE: Duration = Duration::from_secs(30);

/// A running service plus the levers to stop it.
pub struct ShutdownHandle {
    signal_task: tokio::task::JoinHandle<()>,
    workers: Vec<tokio::task::JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Park until the service winds down, whether by signal or by an
    /// explicit [`ShutdownHandle::shutdown`] call.
    pub async fn wait(self) {
        let _ = self.signal_task.await;

        if timeout(DRAIN_DEADLINE, join_all(self.workers)).await.is_err() {
            tracing::error!(
                "workers still running {}s after shutdown, giving up",
                DRAIN_DEADLINE.as_secs()
            );
            std::process::exit(4);
        }
    }

    /// Stop the service without waiting for a signal.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Install the tracing subscriber: a compact stdout layer, plus a daily
/// rolling file layer when a log directory is configured.
///
/// The returned guards flush the non-blocking writers; keep them alive for
/// the life of the process.
fn init_logging(config: &ServiceConfig) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let level_filter = || {
        EnvFilter::builder()
            .with_default_directive(config.log_level.into())
            .from_env_lossy()
    };

    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(level_filter());

    let mut guards = vec![stdout_guard];

    if let Some(log_dir) = &config.log_dir {
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!("Warning: failed to create log directory {log_dir:?}: {e}");
        }

        let appender = tracing_appender::rolling::daily(log_dir, "stash.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
        guards.push(file_guard);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(level_filter());

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(stdout_layer).init();
    }

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Build service state and launch the wire server task.
///
/// The returned handle must be kept around; dropping it neither stops the
/// service nor detaches the signal listener.
pub async fn start_service(
    config: &ServiceConfig,
) -> Result<(ServiceState, ShutdownHandle), StateSetupError> {
    let (signal_task, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker();
    let state = ServiceState::from_config(config).await?;

    let server = {
        let listen_addr = config.listen_addr;
        let max_connections = config.max_connections;
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = wire_server::run(listen_addr, max_connections, state, shutdown_rx).await
            {
                tracing::error!("wire server error: {e}");
            }
        })
    };

    tracing::info!(addr = %config.listen_addr, "service running");

    let handle = ShutdownHandle {
        signal_task,
        workers: vec![server],
        shutdown_tx,
    };

    Ok((state, handle))
}

/// Run the daemon until a shutdown signal lands. The CLI entry point.
pub async fn spawn_service(config: &ServiceConfig) -> Result<(), StateSetupError> {
    let _guards = init_logging(config);
    let (_state, handle) = start_service(config).await?;
    handle.wait().await;
    Ok(())
}
