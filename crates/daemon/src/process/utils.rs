use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How long SIGTERM waits before the shutdown signal goes out, giving
/// in-flight commands time to finish.
const SIGTERM_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Spawns a task that turns SIGINT/SIGTERM into a shutdown signal on a watch
/// channel.
///
/// SIGINT shuts down immediately; SIGTERM waits out the grace period first.
/// Returns the join handle, the sender (for programmatic shutdown), and the
/// receiver.
pub fn graceful_shutdown_blocker() -> (JoinHandle<()>, watch::Sender<()>, watch::Receiver<()>) {
    let (tx, rx) = watch::channel(());
    let signal_tx = tx.clone();

    let handle = tokio::spawn(async move {
        let mut sigint = signal(SignalKind::interrupt()).expect("SIGINT handler");
        let mut sigterm = signal(SignalKind::terminate()).expect("SIGTERM handler");

        tokio::select! {
            _ = sigint.recv() => {
                tracing::debug!("SIGINT, shutting down now");
            }
            _ = sigterm.recv() => {
                tokio::time::sleep(SIGTERM_GRACE_PERIOD).await;
                tracing::debug!("SIGTERM grace period over, shutting down");
            }
        }

        let _ = signal_tx.send(());
    });

    (handle, tx, rx)
}

/// Route panics through `tracing` so they land in the same sinks as every
/// other log line.
pub fn register_panic_logger() {
    std::panic::set_hook(Box::new(|info| match info.location() {
        Some(loc) => tracing::error!(
            panic.file = loc.file(),
            panic.line = loc.line(),
            "{info}"
        ),
        None => tracing::error!("{info}"),
    }));
}

pub fn report_build_info() {
    let build = common::prelude::build_info();

    tracing::info!(
        version = build.version,
        profile = build.build_profile,
        "service starting up"
    );
}
