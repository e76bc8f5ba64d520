//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. It registers the player with the hub, then
//! loops: decoded frames go to the hub as commands, and whatever the hub
//! queues in the player's outbox goes out on the socket.

use scrawl_game::Command;
use scrawl_protocol::{Codec, PlayerId, ServerEvent};
use scrawl_transport::{Connection, TransportError, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ScrawlError;
use crate::hub::{Frame, Inbound};

/// Tells the hub the player is gone when the handler exits, however it
/// exits.
struct DisconnectGuard {
    player: PlayerId,
    hub: mpsc::UnboundedSender<Inbound>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let _ = self.hub.send(Inbound::Command(Command::Disconnect {
            player: self.player,
        }));
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    hub: mpsc::UnboundedSender<Inbound>,
    codec: C,
) -> Result<(), ScrawlError> {
    let conn_id = conn.id();
    let player = PlayerId(conn_id.into_inner());

    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<Frame>();
    hub.send(Inbound::Connected { player, outbox })
        .map_err(|_| ScrawlError::Shutdown)?;
    let _guard = DisconnectGuard {
        player,
        hub: hub.clone(),
    };
    tracing::info!(%conn_id, player_id = %player, "player connected");

    loop {
        tokio::select! {
            received = conn.recv() => match received {
                Ok(Some(data)) => {
                    let command = match codec.decode_command(&data) {
                        Ok(command) => command,
                        Err(e) => {
                            tracing::debug!(player_id = %player, error = %e, "undecodable message");
                            send_error(&conn, &codec, "Invalid message").await?;
                            continue;
                        }
                    };
                    hub.send(Inbound::Command(Command::Client { player, command }))
                        .map_err(|_| ScrawlError::Shutdown)?;
                }
                Ok(None) => {
                    tracing::info!(player_id = %player, "connection closed cleanly");
                    break;
                }
                Err(TransportError::MessageTooLarge(detail)) => {
                    tracing::info!(player_id = %player, %detail, "message too large");
                    // The socket may already be unusable.
                    let _ = send_error(&conn, &codec, "Message too large").await;
                    break;
                }
                Err(e) if e.is_disconnect() => {
                    tracing::info!(player_id = %player, error = %e, "connection dropped");
                    break;
                }
                Err(e) => {
                    tracing::warn!(player_id = %player, error = %e, "recv failed");
                    break;
                }
            },
            Some(frame) = outbox_rx.recv() => {
                conn.send(&frame).await?;
            }
        }
    }

    // _guard drops here and the hub runs the departure.
    Ok(())
}

/// Sends an `error-message` event straight to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    message: &str,
) -> Result<(), ScrawlError> {
    let bytes = codec.encode_event(&ServerEvent::error(message))?;
    conn.send(&bytes).await?;
    Ok(())
}
