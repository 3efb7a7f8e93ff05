//! Per-connection handler: decode requests, run them, send replies.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. Requests on one connection are handled in order;
//! different connections run concurrently and only meet in the session
//! store.

use std::sync::Arc;

use wordforge_game::{GameError, IdProvider, WordSource};
use wordforge_protocol::{ClientMessage, Codec, Envelope, ServerMessage};
use wordforge_transport::{Connection, WebSocketConnection};

use crate::server::ServerState;
use crate::WordforgeError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<W, I, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<W, I, C>>,
) -> Result<(), WordforgeError>
where
    W: WordSource,
    I: IdProvider,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::debug!(%conn_id, "connection idle, closing");
                let _ = conn.close().await;
                break;
            }
        };

        let reply = match state.codec.decode::<Envelope<ClientMessage>>(&data) {
            Ok(request) => Envelope {
                seq: request.seq,
                payload: dispatch(&state, request.payload).await,
            },
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode request");
                Envelope {
                    seq: 0,
                    payload: ServerMessage::error(
                        400,
                        format!("the request couldn't be decoded: {e}"),
                    ),
                }
            }
        };

        let bytes = state.codec.encode(&reply)?;
        conn.send(&bytes).await?;
    }

    Ok(())
}

/// Runs one request against the game service.
async fn dispatch<W, I, C>(state: &ServerState<W, I, C>, request: ClientMessage) -> ServerMessage
where
    W: WordSource,
    I: IdProvider,
    C: Codec,
{
    let result = match request {
        ClientMessage::NewGame => state.service.new_game().await,
        ClientMessage::Guess { id, guess } => state.service.guess(&id, &guess).await,
        ClientMessage::Health => {
            return ServerMessage::Health {
                status: "ok".to_string(),
            };
        }
    };

    match result {
        Ok(summary) => ServerMessage::Game(summary),
        Err(e) => error_reply(&e),
    }
}

fn error_reply(err: &GameError) -> ServerMessage {
    let code = err.status_code();
    if code >= 500 {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::debug!(error = %err, code, "request rejected");
    }
    ServerMessage::error(code, err.to_string())
}
