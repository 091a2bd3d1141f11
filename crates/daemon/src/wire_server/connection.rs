use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::watch;

use common::proto::{Reply, MAX_LINE_BYTES};

use crate::ServiceState;

/// Serve one connection: read newline-terminated commands, dispatch each
/// against the shared state, answer with one line per command.
///
/// The loop exits on EOF, on a transport error, on an oversized line, or at
/// the next read boundary once shutdown is signalled; an in-flight command
/// always runs to completion first. Dropping the session on the way out
/// releases its directory residency.
pub(super) async fn handle(
    stream: TcpStream,
    peer: SocketAddr,
    state: ServiceState,
    mut shutdown_rx: watch::Receiver<()>,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    // The take limit bounds how much a single line may buffer; it is
    // topped back up before every read.
    let mut reader = BufReader::new(read_half).take(0);
    let mut session = state.dispatcher().open_session();
    let mut line = String::new();

    tracing::debug!(session = %session.id(), %peer, "session opened");

    loop {
        line.clear();
        reader.set_limit(MAX_LINE_BYTES as u64 + 1);

        let read = tokio::select! {
            _ = shutdown_rx.changed() => break,
            read = reader.read_line(&mut line) => read?,
        };
        if read == 0 {
            break;
        }

        if line.trim_end_matches(['\r', '\n']).len() > MAX_LINE_BYTES {
            // Drain the rest of the line in bounded chunks so the close
            // below is a clean FIN rather than a reset.
            while !line.ends_with('\n') {
                line.clear();
                reader.set_limit(MAX_LINE_BYTES as u64 + 1);
                if reader.read_line(&mut line).await? == 0 {
                    break;
                }
            }
            let mut out = Reply::MalformedCommand.to_string();
            out.push('\n');
            write_half.write_all(out.as_bytes()).await?;
            tracing::debug!(session = %session.id(), %peer, "oversized line, closing");
            break;
        }
        let request = line.trim_end_matches(['\r', '\n']);

        if let Some(reply) = state.dispatcher().dispatch(&mut session, request).await {
            let mut out = reply.to_string();
            out.push('\n');
            write_half.write_all(out.as_bytes()).await?;
        }
    }

    tracing::debug!(session = %session.id(), user = ?session.user(), %peer, "session closed");
    Ok(())
}
