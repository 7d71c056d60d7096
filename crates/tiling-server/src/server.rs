//! WebSocket server and connection handling.

use crate::data::GameData;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::{BoardSession, SessionError};
use dashmap::DashMap;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tiling_core::evaluate;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Server state shared across all connections.
pub struct ServerState {
    /// Catalog, cards and scoring tables
    pub data: Arc<GameData>,
    /// One editing session per connection
    pub sessions: DashMap<Uuid, BoardSession>,
    /// Mapping from session ID to its message sender
    pub senders: DashMap<Uuid, mpsc::UnboundedSender<ServerMessage>>,
}

impl ServerState {
    pub fn new(data: Arc<GameData>) -> Self {
        Self {
            data,
            sessions: DashMap::new(),
            senders: DashMap::new(),
        }
    }

    /// Send a message to a specific session.
    pub fn send_to(&self, session_id: Uuid, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&session_id) {
            let _ = sender.send(msg);
        }
    }

    /// Apply a change to a session and answer with the new report or the rejection.
    fn update_session<F>(&self, session_id: Uuid, change: F)
    where
        F: FnOnce(&mut BoardSession, &GameData) -> Result<(), SessionError>,
    {
        let Some(mut session) = self.sessions.get_mut(&session_id) else {
            warn!("Message for unknown session {}", session_id);
            return;
        };

        let reply = match change(&mut session, &self.data) {
            Ok(()) => ServerMessage::BoardUpdated {
                report: session.report(&self.data),
            },
            Err(e) => {
                debug!("Rejected change for {}: {}", session_id, e);
                ServerMessage::Error {
                    message: e.to_string(),
                }
            }
        };

        drop(session); // Release lock before sending
        self.send_to(session_id, reply);
    }
}

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, state: Arc<ServerState>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Tiling server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let session_id = Uuid::new_v4();
    let session = BoardSession::new();
    let initial = ServerMessage::BoardUpdated {
        report: session.report(&state.data),
    };
    state.sessions.insert(session_id, session);

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    state.senders.insert(session_id, tx);

    let welcome = ServerMessage::Welcome { session_id };
    ws_sender
        .send(Message::Text(serde_json::to_string(&welcome)?))
        .await?;
    ws_sender
        .send(Message::Text(serde_json::to_string(&initial)?))
        .await?;

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(session_id, client_msg, &state),
                Err(e) => {
                    warn!("Invalid message from {}: {} ({})", session_id, text, e);
                    state.send_to(
                        session_id,
                        ServerMessage::Error {
                            message: format!("Invalid message: {}", e),
                        },
                    );
                }
            },
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", session_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                state.send_to(session_id, ServerMessage::Pong);
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", session_id, e);
                break;
            }
            _ => {}
        }
    }

    // Clean up on disconnect
    state.sessions.remove(&session_id);
    state.senders.remove(&session_id);
    send_task.abort();

    info!("Connection closed for {}", session_id);
    Ok(())
}

/// Handle a client message.
fn handle_message(session_id: Uuid, msg: ClientMessage, state: &Arc<ServerState>) {
    match msg {
        ClientMessage::PlaceTile { index, piece, side } => {
            state.update_session(session_id, |s, data| s.place_tile(index, piece, side, data));
        }

        ClientMessage::RotateTile { index } => {
            state.update_session(session_id, |s, _| s.rotate_tile(index));
        }

        ClientMessage::FlipTile { index } => {
            state.update_session(session_id, |s, _| s.flip_tile(index));
        }

        ClientMessage::SwapTiles { from, to } => {
            state.update_session(session_id, |s, _| s.swap_tiles(from, to));
        }

        ClientMessage::MoveTile { from, to } => {
            state.update_session(session_id, |s, _| s.move_tile(from, to));
        }

        ClientMessage::RemoveTile { index } => {
            state.update_session(session_id, |s, _| s.remove_tile(index));
        }

        ClientMessage::ToggleCard { card } => {
            state.update_session(session_id, |s, data| s.toggle_card(card, data).map(|_| ()));
        }

        ClientMessage::LoadOptimal => {
            state.update_session(session_id, |s, data| s.load_optimal(data));
        }

        ClientMessage::Reset => {
            state.update_session(session_id, |s, _| {
                s.reset();
                Ok(())
            });
        }

        ClientMessage::Evaluate { board } => {
            let evaluation = evaluate(&board, &state.data.catalog);
            state.send_to(session_id, ServerMessage::Evaluation { evaluation });
        }

        ClientMessage::Ping => {
            state.send_to(session_id, ServerMessage::Pong);
        }
    }
}
