//! WebSocket protocol messages for the board analysis service.

use serde::{Deserialize, Serialize};
use tiling_core::{Board, CardId, CardScore, Evaluation};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Put a piece from the palette into an empty cell, unrotated
    PlaceTile { index: usize, piece: u8, side: u8 },

    /// Turn a placed tile a quarter clockwise
    RotateTile { index: usize },

    /// Turn a placed tile over
    FlipTile { index: usize },

    /// Exchange two placed tiles
    SwapTiles { from: usize, to: usize },

    /// Move a placed tile into an empty cell
    MoveTile { from: usize, to: usize },

    /// Take a tile off the board
    RemoveTile { index: usize },

    /// Select or deselect an objective card
    ToggleCard { card: CardId },

    /// Replace the board with the best known board for the selected cards
    LoadOptimal,

    /// Clear the board
    Reset,

    /// Evaluate a board without touching the session
    Evaluate { board: Board },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned session ID
    Welcome { session_id: Uuid },

    /// Session board or selection changed
    BoardUpdated { report: BoardReport },

    /// Result of a one-shot evaluation
    Evaluation { evaluation: Evaluation },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Everything a client needs to render its session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardReport {
    pub board: Board,
    pub selected_cards: Vec<CardId>,
    pub evaluation: Evaluation,
    /// Scores of the selected cards; empty unless the board is valid and percentiles loaded
    pub scores: Vec<CardScore>,
}
