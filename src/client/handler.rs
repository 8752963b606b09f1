use log::{error, info, warn};
use std::io;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

use crate::client::Client;
use crate::protocol::responses::{UNKNOWN_COMMAND, format_response};
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::server::GatewayContext;

/// One request line as read off the wire.
enum Line {
    Complete(Vec<u8>),
    /// Over the limit; `unterminated` if the rest is still unread
    TooLong { unterminated: bool },
    Closed,
}

/// Handles one gateway client connection using Tokio async runtime.
///
/// - Uses BufReader to read request lines from the client, never buffering
///   more than `max_line_length` bytes of one line.
/// - Dispatches commands using `handle_command`.
/// - Keeps the connection's authentication state in a local `Client`.
pub async fn handle_client<S>(stream: S, peer: String, ctx: Arc<GatewayContext>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let mut client = Client::new(peer.clone());

    loop {
        let bytes = match read_line(&mut reader, ctx.max_line_length).await {
            Ok(Line::Complete(bytes)) => bytes,
            Ok(Line::TooLong { unterminated }) => {
                warn!("Line over {} bytes from {} rejected", ctx.max_line_length, peer);
                let reply = format_response(UNKNOWN_COMMAND, "Command too long");
                if !send(&mut write_half, &peer, &reply).await {
                    break;
                }
                if !unterminated {
                    continue;
                }
                match discard_rest_of_line(&mut reader, ctx.max_line_length).await {
                    Ok(true) => continue,
                    Ok(false) => {
                        info!("Connection closed by client {}", peer);
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read from {}: {}", peer, e);
                        break;
                    }
                }
            }
            Ok(Line::Closed) => {
                // Client closed the connection
                info!("Connection closed by client {}", peer);
                break;
            }
            Err(e) => {
                error!("Failed to read from {}: {}", peer, e);
                break;
            }
        };

        let line = match String::from_utf8(bytes) {
            Ok(line) => line,
            Err(_) => {
                warn!("Line from {} is not valid UTF-8", peer);
                let reply = format_response(UNKNOWN_COMMAND, "Invalid request encoding");
                if !send(&mut write_half, &peer, &reply).await {
                    break;
                }
                continue;
            }
        };

        let command = parse_command(&line);
        let result = handle_command(&mut client, &command, &ctx).await;

        if let Some(msg) = &result.message {
            if !send(&mut write_half, &peer, msg).await {
                break;
            }
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", peer);
            break;
        }
    }

    let _ = write_half.shutdown().await;
    info!(
        "Client {} disconnected ({})",
        peer,
        client.username().unwrap_or("not logged in")
    );
}

/// Writes one reply; `false` once the client can no longer be written to.
async fn send<W>(writer: &mut W, peer: &str, reply: &str) -> bool
where
    W: AsyncWrite + Unpin,
{
    match writer.write_all(reply.as_bytes()).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to write to {}: {}", peer, e);
            false
        }
    }
}

/// Reads up to `limit` bytes of the next line, terminator included.
async fn read_line<R>(reader: &mut R, limit: usize) -> io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let read = (&mut *reader)
        .take(limit as u64 + 1)
        .read_until(b'\n', &mut buf)
        .await?;

    if read == 0 {
        Ok(Line::Closed)
    } else if buf.len() > limit {
        Ok(Line::TooLong {
            unterminated: !buf.ends_with(b"\n"),
        })
    } else {
        Ok(Line::Complete(buf))
    }
}

/// Skips input up to and including the next `\n`, `limit` bytes at a time.
///
/// Returns `false` if the client closed the connection first.
async fn discard_rest_of_line<R>(reader: &mut R, limit: usize) -> io::Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    let mut chunk = Vec::with_capacity(limit);
    loop {
        chunk.clear();
        let read = (&mut *reader)
            .take(limit as u64)
            .read_until(b'\n', &mut chunk)
            .await?;
        if read == 0 {
            return Ok(false);
        }
        if chunk.ends_with(b"\n") {
            return Ok(true);
        }
    }
}
