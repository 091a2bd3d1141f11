use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::{watch, Semaphore};

mod connection;

use crate::ServiceState;

/// Bind and serve the wire protocol until shutdown is signalled.
pub async fn run(
    listen_addr: std::net::SocketAddr,
    max_connections: usize,
    state: ServiceState,
    shutdown_rx: watch::Receiver<()>,
) -> Result<(), WireServerError> {
    let listener = TcpListener::bind(listen_addr).await?;
    tracing::info!(addr = ?listen_addr, "wire server listening");
    serve(listener, max_connections, state, shutdown_rx).await
}

/// Accept loop over an already-bound listener.
///
/// Each accepted connection runs on its own task holding a permit from the
/// connection limiter; when the limiter is exhausted, accepting pauses until
/// a session ends (backpressure, not refusal). A connection failing only
/// ends its own task; the loop keeps serving until `shutdown_rx` fires.
pub async fn serve(
    listener: TcpListener,
    max_connections: usize,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> Result<(), WireServerError> {
    let limiter = Arc::new(Semaphore::new(max_connections));

    loop {
        let permit = tokio::select! {
            _ = shutdown_rx.changed() => break,
            permit = limiter.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => break,
            },
        };

        let (stream, peer) = tokio::select! {
            _ = shutdown_rx.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!("failed to accept connection: {e}");
                    continue;
                }
            },
        };

        let state = state.clone();
        let connection_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = connection::handle(stream, peer, state, connection_rx).await {
                tracing::debug!(%peer, "connection ended with error: {e}");
            }
        });
    }

    tracing::info!("wire server shutting down");
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum WireServerError {
    #[error("an error occurred running the wire server: {0}")]
    ServingFailed(#[from] std::io::Error),
}
