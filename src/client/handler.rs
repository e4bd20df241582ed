use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use crate::client::registry::SessionRegistry;
use crate::client::session::SessionContext;
use crate::client::state::Session;
use crate::protocol::responses::{self, Reply, send_reply};
use crate::protocol::{CommandStatus, handle_command, parse_command};

/// Handles an FTP client session using the Tokio async runtime.
///
/// - Splits the control stream and drives [`run_session`] over it.
/// - Removes the session from the registry once it ends.
pub async fn handle_client(
    cmd_stream: TcpStream,
    client_addr: SocketAddr,
    registry: SessionRegistry,
    ctx: Arc<SessionContext>,
) {
    let (read_half, mut write_half) = cmd_stream.into_split();
    let reader = BufReader::new(read_half);

    run_session(reader, &mut write_half, client_addr, &registry, &ctx).await;

    registry.remove(&client_addr).await;
    info!("Client {} disconnected", client_addr);
}

/// Runs the command loop of one control connection.
///
/// The session state lives on this task's stack; nothing else can reach it.
pub async fn run_session<R, W>(
    mut reader: R,
    writer: &mut W,
    client_addr: SocketAddr,
    registry: &SessionRegistry,
    ctx: &SessionContext,
) where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::new(client_addr);

    if let Err(e) = send_greeting(writer, &ctx.config().banner).await {
        error!("Failed to greet {}: {}", client_addr, e);
        return;
    }

    let max_command_length = ctx.config().max_command_length;
    let mut line = Vec::new();

    loop {
        match read_command_line(&mut reader, &mut line, max_command_length).await {
            Ok(LineRead::Closed) => {
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(read) => {
                let text = String::from_utf8_lossy(&line);
                let trimmed = text.trim_end_matches(['\r', '\n']);

                if read == LineRead::TooLong || trimmed.len() > max_command_length {
                    warn!("Command from {} exceeds {} bytes", client_addr, max_command_length);
                    let reply = Reply::new(responses::SYNTAX_ERROR, "Command too long");
                    if send_reply(writer, &reply).await.is_err() {
                        break;
                    }
                    continue;
                }

                let Some(command) = parse_command(trimmed) else {
                    info!("Empty command line from {}, closing session", client_addr);
                    break;
                };
                info!("Received from {}: {}", client_addr, command);

                let result = match handle_command(&mut session, ctx, &command, writer).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Control connection to {} failed: {}", client_addr, e);
                        break;
                    }
                };

                info!("Sending response to client {}: {}", client_addr, result.reply);
                if let Err(e) = send_reply(writer, &result.reply).await {
                    error!("Failed to write to {}: {}", client_addr, e);
                    break;
                }

                registry.update(session.snapshot()).await;

                match result.status {
                    CommandStatus::CloseConnection => {
                        info!("Client {} requested to quit", client_addr);
                        break;
                    }
                    CommandStatus::Failure(reason) => {
                        info!("Command from {} failed: {}", client_addr, reason);
                    }
                    CommandStatus::Success => {}
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineRead {
    Closed,
    Line,
    TooLong,
}

/// Reads one `\n`-terminated line into `line`, keeping at most
/// `max_length` bytes plus the line terminator.
///
/// Bytes past the limit are consumed up to the next `\n` but never stored,
/// and the line is reported as `TooLong`.
async fn read_command_line<R>(
    reader: &mut R,
    line: &mut Vec<u8>,
    max_length: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let limit = max_length + 2;
    let mut too_long = false;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(match (too_long, line.is_empty()) {
                (true, _) => LineRead::TooLong,
                (false, true) => LineRead::Closed,
                (false, false) => LineRead::Line,
            });
        }

        let (used, complete) = match available.iter().position(|&byte| byte == b'\n') {
            Some(index) => (index + 1, true),
            None => (available.len(), false),
        };

        if !too_long {
            if line.len() + used > limit {
                too_long = true;
                line.clear();
            } else {
                line.extend_from_slice(&available[..used]);
            }
        }
        reader.consume(used);

        if complete {
            return Ok(if too_long { LineRead::TooLong } else { LineRead::Line });
        }
    }
}

/// Sends the optional banner as `220-` lines, then `220 Service Ready`.
async fn send_greeting<W>(writer: &mut W, banner: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for banner_line in banner.lines() {
        let continuation = format!("{}-{}\r\n", responses::READY, banner_line);
        writer.write_all(continuation.as_bytes()).await?;
    }
    send_reply(writer, &Reply::new(responses::READY, "Service Ready")).await
}
