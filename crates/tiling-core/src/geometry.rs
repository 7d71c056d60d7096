//! Fixed geometry of the 3x3 board.
//!
//! This module provides the foundational layout types:
//! - `Edge`: the four sides of a tile, in the catalog's index order
//! - `Position`: one of the nine board cells, row-major
//! - `JUNCTION_NODES`: the constant table mapping every (position, edge) pair to the
//!   junction node it touches
//!
//! Junction nodes are numbered row by row. Each row of tiles contributes the top edges
//! of its three cells followed by the four vertical edges running through it, and the
//! bottom border closes the grid:
//!
//! ```text
//!        0     1     2
//!     3  [0]  4  [1]  5  [2]  6
//!        7     8     9
//!    10  [3] 11  [4] 12  [5] 13
//!       14    15    16
//!    17  [6] 18  [7] 19  [8] 20
//!       21    22    23
//! ```
//!
//! Two adjacent cells share the node on their common edge, which is what lets road
//! segments from different tiles join into one road.

use serde::{Deserialize, Serialize};

/// Number of cells along one side of the board
pub const GRID_SIZE: usize = 3;

/// Number of cells on the board
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Number of distinct junction nodes (12 horizontal edges + 12 vertical edges)
pub const NODE_COUNT: usize = 24;

/// Junction node for each `[Left, Top, Right, Bottom]` edge of each position.
pub const JUNCTION_NODES: [[u8; 4]; CELL_COUNT] = [
    // Top row
    [3, 0, 4, 7],
    [4, 1, 5, 8],
    [5, 2, 6, 9],
    // Middle row
    [10, 7, 11, 14],
    [11, 8, 12, 15],
    [12, 9, 13, 16],
    // Bottom row
    [17, 14, 18, 21],
    [18, 15, 19, 22],
    [19, 16, 20, 23],
];

/// One side of a square tile.
///
/// The discriminants match the edge indices used by the tile catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Edge {
    Left = 0,
    Top = 1,
    Right = 2,
    Bottom = 3,
}

impl Edge {
    /// All edges in index order
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];

    /// Look up an edge by its catalog index
    pub const fn from_index(index: u8) -> Option<Edge> {
        match index {
            0 => Some(Edge::Left),
            1 => Some(Edge::Top),
            2 => Some(Edge::Right),
            3 => Some(Edge::Bottom),
            _ => None,
        }
    }

    /// Catalog index of this edge
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The edge this one ends up on after `orientation` clockwise quarter-turns
    pub const fn rotated(self, orientation: u8) -> Edge {
        Edge::ALL[(self as usize + orientation as usize) % 4]
    }

    /// The edge facing this one on a neighbouring tile
    pub const fn opposite(self) -> Edge {
        Edge::ALL[(self as usize + 2) % 4]
    }
}

impl TryFrom<u8> for Edge {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Edge::from_index(value).ok_or_else(|| format!("edge index {} out of range 0-3", value))
    }
}

impl From<Edge> for u8 {
    fn from(edge: Edge) -> u8 {
        edge as u8
    }
}

/// A cell of the board, indexed row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// All nine positions in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..CELL_COUNT as u8).map(Position)
    }

    /// Create a position from a row-major index, if it is on the board
    pub const fn new(index: usize) -> Option<Position> {
        if index < CELL_COUNT {
            Some(Position(index as u8))
        } else {
            None
        }
    }

    /// Create a position from row and column
    pub const fn from_row_col(row: usize, col: usize) -> Option<Position> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Position((row * GRID_SIZE + col) as u8))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> usize {
        self.0 as usize / GRID_SIZE
    }

    pub const fn col(self) -> usize {
        self.0 as usize % GRID_SIZE
    }

    /// The neighbouring position across the given edge, if any
    pub fn neighbor(self, edge: Edge) -> Option<Position> {
        let (row, col) = (self.row(), self.col());
        match edge {
            Edge::Left => col.checked_sub(1).and_then(|c| Position::from_row_col(row, c)),
            Edge::Top => row.checked_sub(1).and_then(|r| Position::from_row_col(r, col)),
            Edge::Right => Position::from_row_col(row, col + 1),
            Edge::Bottom => Position::from_row_col(row + 1, col),
        }
    }

    /// Orthogonal neighbours (no diagonals)
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Edge::ALL.into_iter().filter_map(move |edge| self.neighbor(edge))
    }

    /// Junction node on the given (already rotated) edge of this cell
    pub const fn junction(self, edge: Edge) -> usize {
        JUNCTION_NODES[self.0 as usize][edge as usize] as usize
    }
}

impl TryFrom<u8> for Position {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::new(value as usize)
            .ok_or_else(|| format!("cell index {} out of range 0-{}", value, CELL_COUNT - 1))
    }
}

impl From<Position> for u8 {
    fn from(pos: Position) -> u8 {
        pos.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_edge_rotation_wraps() {
        assert_eq!(Edge::Left.rotated(1), Edge::Top);
        assert_eq!(Edge::Bottom.rotated(1), Edge::Left);
        assert_eq!(Edge::Right.rotated(3), Edge::Top);
        for edge in Edge::ALL {
            assert_eq!(edge.rotated(4), edge);
            assert_eq!(edge.opposite().opposite(), edge);
        }
    }

    #[test]
    fn test_edge_from_index_rejects_out_of_range() {
        assert_eq!(Edge::from_index(2), Some(Edge::Right));
        assert_eq!(Edge::from_index(4), None);
        assert!(Edge::try_from(7u8).is_err());
    }

    #[test]
    fn test_position_neighbors() {
        let corner = Position::new(0).unwrap();
        assert_eq!(corner.neighbors().count(), 2);

        let center = Position::new(4).unwrap();
        let around: Vec<usize> = center.neighbors().map(Position::index).collect();
        assert_eq!(around, vec![3, 1, 5, 7]);

        assert_eq!(Position::new(8).unwrap().neighbor(Edge::Right), None);
        assert_eq!(Position::new(9), None);
    }

    #[test]
    fn test_position_json_is_range_checked() {
        let pos: Position = serde_json::from_str("7").unwrap();
        assert_eq!(pos.index(), 7);
        assert_eq!(serde_json::to_string(&pos).unwrap(), "7");
        assert!(serde_json::from_str::<Position>("9").is_err());
        assert!(serde_json::from_str::<Position>("50").is_err());
    }

    #[test]
    fn test_junction_table_covers_every_node() {
        let mut uses: HashMap<u8, usize> = HashMap::new();
        for row in JUNCTION_NODES {
            for node in row {
                *uses.entry(node).or_default() += 1;
            }
        }
        assert_eq!(uses.len(), NODE_COUNT);
        assert!(uses.keys().all(|&n| (n as usize) < NODE_COUNT));

        // 12 shared edges inside the grid, 12 border edges
        let shared = uses.values().filter(|&&count| count == 2).count();
        let border = uses.values().filter(|&&count| count == 1).count();
        assert_eq!(shared, 12);
        assert_eq!(border, 12);
    }

    #[test]
    fn test_adjacent_cells_share_junctions() {
        for pos in Position::all() {
            for edge in Edge::ALL {
                match pos.neighbor(edge) {
                    Some(other) => assert_eq!(
                        pos.junction(edge),
                        other.junction(edge.opposite()),
                        "cell {} and cell {} should meet on one node",
                        pos.index(),
                        other.index()
                    ),
                    None => {
                        // Border node must not appear anywhere else
                        let node = pos.junction(edge);
                        let owners = Position::all()
                            .flat_map(|p| Edge::ALL.map(|e| p.junction(e)))
                            .filter(|&n| n == node)
                            .count();
                        assert_eq!(owners, 1);
                    }
                }
            }
        }
    }
}
