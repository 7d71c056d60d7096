//! Board snapshot: nine cells, each empty or holding a placed tile.
//!
//! The engine only ever reads a `Board`. The editing helpers here operate on the
//! caller's own copy and never touch shared state.

use crate::geometry::{Position, CELL_COUNT};
use serde::{Deserialize, Serialize};

/// Piece identifier within the catalog (0-8 for the standard set)
pub type PieceId = u8;

/// A tile put on the board: which piece, which face up, and how far it is turned.
///
/// Serialized as a `[piece, side, orientation]` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8, u8)", into = "(u8, u8, u8)")]
pub struct Placement {
    pub piece: PieceId,
    /// Face shown (0 or 1)
    pub side: u8,
    /// Clockwise quarter-turns (0-3)
    pub orientation: u8,
}

impl Placement {
    /// Create a placement; orientation is reduced mod 4 and side mod 2
    pub const fn new(piece: PieceId, side: u8, orientation: u8) -> Self {
        Self {
            piece,
            side: side % 2,
            orientation: orientation % 4,
        }
    }

    /// Turned one more quarter clockwise
    pub const fn rotated(self) -> Self {
        Self::new(self.piece, self.side, self.orientation + 1)
    }

    /// Other face up, same orientation
    pub const fn flipped(self) -> Self {
        Self::new(self.piece, self.side + 1, self.orientation)
    }
}

impl From<(u8, u8, u8)> for Placement {
    fn from((piece, side, orientation): (u8, u8, u8)) -> Self {
        Placement::new(piece, side, orientation)
    }
}

impl From<Placement> for (u8, u8, u8) {
    fn from(p: Placement) -> Self {
        (p.piece, p.side, p.orientation)
    }
}

/// The 3x3 board in row-major order.
///
/// Serialized as an array of exactly nine entries, each `null` or a placement triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Placement>>", into = "Vec<Option<Placement>>")]
pub struct Board {
    cells: [Option<Placement>; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// A full board
    pub fn from_placements(placements: [Placement; CELL_COUNT]) -> Self {
        Self {
            cells: placements.map(Some),
        }
    }

    pub fn from_cells(cells: [Option<Placement>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Option<Placement>; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, pos: Position) -> Option<Placement> {
        self.cells[pos.index()]
    }

    pub fn set(&mut self, pos: Position, placement: Option<Placement>) {
        self.cells[pos.index()] = placement;
    }

    /// Remove and return the tile at a position
    pub fn take(&mut self, pos: Position) -> Option<Placement> {
        self.cells[pos.index()].take()
    }

    /// Turn the tile at `pos` one quarter clockwise. Returns false if the cell is empty.
    pub fn rotate(&mut self, pos: Position) -> bool {
        match self.cells[pos.index()].as_mut() {
            Some(p) => {
                *p = p.rotated();
                true
            }
            None => false,
        }
    }

    /// Turn the tile at `pos` over. Returns false if the cell is empty.
    pub fn flip(&mut self, pos: Position) -> bool {
        match self.cells[pos.index()].as_mut() {
            Some(p) => {
                *p = p.flipped();
                true
            }
            None => false,
        }
    }

    /// Exchange the contents of two cells (either may be empty)
    pub fn swap(&mut self, a: Position, b: Position) {
        self.cells.swap(a.index(), b.index());
    }

    /// Move a tile into an empty cell. Returns false if the source is empty or the
    /// target is occupied.
    pub fn move_tile(&mut self, from: Position, to: Position) -> bool {
        if from == to || self.cells[to.index()].is_some() {
            return false;
        }
        match self.cells[from.index()].take() {
            Some(p) => {
                self.cells[to.index()] = Some(p);
                true
            }
            None => false,
        }
    }

    /// Whether a piece is already somewhere on the board
    pub fn contains_piece(&self, piece: PieceId) -> bool {
        self.cells.iter().flatten().any(|p| p.piece == piece)
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Indices of cells with no tile
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// All nine placements, or `None` while any cell is empty
    pub fn placements(&self) -> Option<[Placement; CELL_COUNT]> {
        let mut out = [Placement::new(0, 0, 0); CELL_COUNT];
        for (slot, cell) in out.iter_mut().zip(self.cells.iter()) {
            *slot = (*cell)?;
        }
        Some(out)
    }
}

impl TryFrom<Vec<Option<Placement>>> for Board {
    type Error = String;

    fn try_from(cells: Vec<Option<Placement>>) -> Result<Self, Self::Error> {
        let found = cells.len();
        let cells: [Option<Placement>; CELL_COUNT] = cells
            .try_into()
            .map_err(|_| format!("board must have exactly {} cells, found {}", CELL_COUNT, found))?;
        Ok(Self { cells })
    }
}

impl From<Board> for Vec<Option<Placement>> {
    fn from(board: Board) -> Self {
        board.cells.to_vec()
    }
}
