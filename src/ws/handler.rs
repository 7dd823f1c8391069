//! WebSocket upgrade handler

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::game::snapshot::EncodedSnapshot;
use crate::game::{ArenaEvent, ArenaHandle, PlayerId};
use crate::ws::protocol::{decode_client_msg, ServerMsg};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.arena))
}

/// Fresh opaque player id
pub fn new_player_id() -> PlayerId {
    Uuid::new_v4().simple().to_string()
}

/// Handle the upgraded WebSocket connection
async fn handle_socket(socket: WebSocket, arena: ArenaHandle) {
    let player_id = new_player_id();
    info!(player_id = %player_id, "Player connected");

    let (mut ws_sink, ws_stream) = socket.split();

    // The id frame must precede every snapshot on this connection
    let id_frame = match (ServerMsg::Id { id: &player_id }).encode() {
        Ok(text) => text,
        Err(e) => {
            error!(player_id = %player_id, error = %e, "Failed to encode id message");
            return;
        }
    };
    if let Err(e) = ws_sink.send(Message::Text(id_frame)).await {
        debug!(player_id = %player_id, error = %e, "Failed to send id message");
        return;
    }

    let snapshot_rx = arena.subscribe();
    if !arena
        .send(ArenaEvent::Connect {
            player_id: player_id.clone(),
        })
        .await
    {
        error!(player_id = %player_id, "Arena is not running");
        return;
    }

    run_session(&player_id, ws_sink, ws_stream, &arena, snapshot_rx).await;

    // Unconditional: the entry goes away whether alive or dead
    let _ = arena
        .send(ArenaEvent::Disconnect {
            player_id: player_id.clone(),
        })
        .await;

    info!(player_id = %player_id, "Player disconnected");
}

/// Run the WebSocket session with read/write split
async fn run_session(
    player_id: &str,
    mut ws_sink: SplitSink<WebSocket, Message>,
    mut ws_stream: SplitStream<WebSocket>,
    arena: &ArenaHandle,
    mut snapshot_rx: broadcast::Receiver<EncodedSnapshot>,
) {
    // Writer task: broadcast snapshots -> WebSocket
    let writer_player_id = player_id.to_string();
    let writer_handle = tokio::spawn(async move {
        loop {
            match snapshot_rx.recv().await {
                Ok(snapshot) => {
                    // axum 0.7 text frames own a String, so each connection copies the shared encoding
                    if let Err(e) = ws_sink.send(Message::Text(snapshot.to_string())).await {
                        debug!(player_id = %writer_player_id, error = %e, "WebSocket send failed");
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(
                        player_id = %writer_player_id,
                        lagged_count = n,
                        "Client lagged, skipping {} snapshots", n
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!(player_id = %writer_player_id, "Snapshot channel closed");
                    break;
                }
            }
        }
    });

    // Reader loop: WebSocket -> arena
    while let Some(result) = ws_stream.next().await {
        match result {
            Ok(Message::Text(text)) => match decode_client_msg(&text) {
                Ok(msg) => {
                    let event = ArenaEvent::Input {
                        player_id: player_id.to_string(),
                        msg,
                    };
                    if !arena.send(event).await {
                        debug!(player_id = %player_id, "Event channel closed");
                        break;
                    }
                }
                Err(e) => {
                    debug!(player_id = %player_id, error = %e, "Dropping undecodable client message");
                }
            },
            Ok(Message::Binary(_)) => {
                debug!(player_id = %player_id, "Received binary message, ignoring");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                debug!(player_id = %player_id, "Client initiated close");
                break;
            }
            Err(e) => {
                debug!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    writer_handle.abort();
}
