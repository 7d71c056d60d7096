//! Board validation: edge compatibility between neighbours and absence of road loops.
//!
//! A board is valid when every pair of touching edges agrees (both carry a road or
//! neither does) and no set of road segments closes into a loop. The loop check runs a
//! union-find over the junction nodes of the geometry table. Road reconstruction relies on
//! a valid board: with loops ruled out every road component is a simple path.

use crate::board::{Board, Placement};
use crate::geometry::{Edge, Position, CELL_COUNT, GRID_SIZE, NODE_COUNT};
use crate::tile::{Connectivity, TileCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies a placed tile in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRef {
    /// Board cell, row-major
    pub position: usize,
    pub piece: u8,
    pub side: u8,
}

impl TileRef {
    fn at(position: Position, placement: Placement) -> Self {
        Self {
            position: position.index(),
            piece: placement.piece,
            side: placement.side,
        }
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "piece {} (side {}) at cell {}",
            self.piece, self.side, self.position
        )
    }
}

/// Reasons a board cannot be analyzed
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum BoardError {
    #[error("Board is incomplete: {} empty cell(s)", empty_cells.len())]
    Incomplete { empty_cells: Vec<usize> },

    #[error("The {first} and the {second} do not connect")]
    EdgeMismatch { first: TileRef, second: TileRef },

    #[error("Cycle detected in the road network")]
    Cycle,
}

/// Validation outcome as plain data, for callers that render it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub error: Option<String>,
}

impl From<Result<(), BoardError>> for Validation {
    fn from(result: Result<(), BoardError>) -> Self {
        match result {
            Ok(()) => Validation {
                valid: true,
                error: None,
            },
            Err(e) => Validation {
                valid: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Disjoint-set forest over junction nodes, with path compression.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
        }
    }

    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Join the sets of `i` and `j`. Returns true if they were already joined.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return true;
        }
        self.parent[root_i] = root_j;
        false
    }
}

/// Check a board snapshot. Incomplete boards are reported, never analyzed.
pub fn validate(board: &Board, catalog: &TileCatalog) -> Result<(), BoardError> {
    let placements = board.placements().ok_or_else(|| BoardError::Incomplete {
        empty_cells: board.empty_cells(),
    })?;
    validate_placements(&placements, catalog)
}

/// Same as [`validate`] returning the data form
pub fn validation(board: &Board, catalog: &TileCatalog) -> Validation {
    validate(board, catalog).into()
}

/// Check a full set of placements: horizontal edges, vertical edges, then loops.
pub fn validate_placements(
    placements: &[Placement; CELL_COUNT],
    catalog: &TileCatalog,
) -> Result<(), BoardError> {
    let conns = placements.map(|p| catalog.connectivity(p));

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE - 1 {
            check_pair(placements, &conns, row, col, Edge::Right)?;
        }
    }

    for row in 0..GRID_SIZE - 1 {
        for col in 0..GRID_SIZE {
            check_pair(placements, &conns, row, col, Edge::Bottom)?;
        }
    }

    check_cycles(placements, catalog)
}

fn check_pair(
    placements: &[Placement; CELL_COUNT],
    conns: &[Connectivity; CELL_COUNT],
    row: usize,
    col: usize,
    towards: Edge,
) -> Result<(), BoardError> {
    let Some(a) = Position::from_row_col(row, col) else {
        return Ok(());
    };
    let Some(b) = a.neighbor(towards) else {
        return Ok(());
    };
    if conns[a.index()].is_open(towards) != conns[b.index()].is_open(towards.opposite()) {
        return Err(BoardError::EdgeMismatch {
            first: TileRef::at(a, placements[a.index()]),
            second: TileRef::at(b, placements[b.index()]),
        });
    }
    Ok(())
}

/// Union every road segment's endpoints; a segment whose endpoints are already joined
/// closes a loop.
pub fn check_cycles(
    placements: &[Placement; CELL_COUNT],
    catalog: &TileCatalog,
) -> Result<(), BoardError> {
    let mut uf = UnionFind::new(NODE_COUNT);
    for (pos, placement) in Position::all().zip(placements.iter()) {
        for road in &catalog.resolve(*placement).roads {
            let [a, b] = road.connection;
            let g1 = pos.junction(a.rotated(placement.orientation));
            let g2 = pos.junction(b.rotated(placement.orientation));
            if uf.union(g1, g2) {
                return Err(BoardError::Cycle);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{RoadSegment, TileSide};

    /// Piece 0: straight left-right; piece 1: corner left-top; piece 2: blank
    fn catalog() -> TileCatalog {
        let straight = TileSide {
            roads: vec![RoadSegment::new(Edge::Left, Edge::Right)],
            ..Default::default()
        };
        let corner = TileSide {
            roads: vec![RoadSegment::new(Edge::Left, Edge::Top)],
            curves: 1,
            ..Default::default()
        };
        TileCatalog::from_pieces(vec![
            [straight.clone(), straight],
            [corner.clone(), corner],
            [TileSide::default(), TileSide::default()],
        ])
        .unwrap()
    }

    fn blank_board() -> [Placement; CELL_COUNT] {
        [Placement::new(2, 0, 0); CELL_COUNT]
    }

    #[test]
    fn test_union_find_detects_repeat() {
        let mut uf = UnionFind::new(4);
        assert!(!uf.union(0, 1));
        assert!(!uf.union(1, 2));
        assert!(uf.union(0, 2));
        assert!(!uf.union(3, 0));
        assert_eq!(uf.find(3), uf.find(2));
    }

    #[test]
    fn test_blank_board_is_valid() {
        assert_eq!(validate_placements(&blank_board(), &catalog()), Ok(()));
    }

    #[test]
    fn test_incomplete_board_is_reported() {
        let board = Board::new();
        let err = validate(&board, &catalog()).unwrap_err();
        assert!(matches!(err, BoardError::Incomplete { ref empty_cells } if empty_cells.len() == 9));
    }

    #[test]
    fn test_horizontal_mismatch_names_both_tiles() {
        let mut placements = blank_board();
        // Straight road in the centre, open into blank neighbours
        placements[4] = Placement::new(0, 0, 0);
        let err = validate_placements(&placements, &catalog()).unwrap_err();
        assert_eq!(
            err,
            BoardError::EdgeMismatch {
                first: TileRef { position: 3, piece: 2, side: 0 },
                second: TileRef { position: 4, piece: 0, side: 0 },
            }
        );
        let message = err.to_string();
        assert!(message.contains("piece 2 (side 0) at cell 3"));
        assert!(message.contains("piece 0 (side 0) at cell 4"));
    }

    #[test]
    fn test_vertical_mismatch() {
        let mut placements = blank_board();
        // Vertical straight in the top-middle cell: bottom edge open against a blank
        // centre. Its top edge faces the border and never gets compared.
        placements[1] = Placement::new(0, 0, 1);
        let err = validate_placements(&placements, &catalog()).unwrap_err();
        assert!(matches!(
            err,
            BoardError::EdgeMismatch { first, second } if first.position == 1 && second.position == 4
        ));
    }

    #[test]
    fn test_ring_of_corners_is_a_cycle() {
        // Four corners in the top-left 2x2 block forming a closed loop
        let mut placements = blank_board();
        placements[0] = Placement::new(1, 0, 2); // right + bottom
        placements[1] = Placement::new(1, 0, 3); // bottom + left
        placements[3] = Placement::new(1, 0, 1); // top + right
        placements[4] = Placement::new(1, 0, 0); // left + top

        let err = validate_placements(&placements, &catalog()).unwrap_err();
        assert_eq!(err, BoardError::Cycle);
        assert_eq!(
            Validation::from(Err(err)),
            Validation {
                valid: false,
                error: Some("Cycle detected in the road network".to_string())
            }
        );
    }

    #[test]
    fn test_open_road_across_row_is_valid() {
        let mut placements = blank_board();
        // Straight road across the middle row runs off both borders
        placements[3] = Placement::new(0, 0, 0);
        placements[4] = Placement::new(0, 1, 2);
        placements[5] = Placement::new(0, 0, 0);
        assert_eq!(validate_placements(&placements, &catalog()), Ok(()));
    }
}
