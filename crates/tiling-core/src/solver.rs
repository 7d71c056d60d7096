//! Valid-board search.
//!
//! Completes a partial board by backtracking over its empty cells in row-major order.
//! Each piece is used at most once. A candidate placement must agree with every already
//! placed neighbour, and a complete board is only accepted if its roads form no loop.

use crate::board::{Board, Placement};
use crate::geometry::{Edge, Position, CELL_COUNT};
use crate::tile::{Connectivity, TileCatalog, SIDES_PER_PIECE};
use crate::validate::check_cycles;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::ControlFlow;

const ORIENTATIONS: u8 = 4;

/// Backtracking search over one catalog
#[derive(Debug, Clone)]
pub struct Solver<'a> {
    catalog: &'a TileCatalog,
    /// Connectivity per piece, side and orientation
    conns: Vec<[[Connectivity; ORIENTATIONS as usize]; SIDES_PER_PIECE]>,
}

impl<'a> Solver<'a> {
    pub fn new(catalog: &'a TileCatalog) -> Self {
        // Catalogs hold at most MAX_PIECES pieces, so every index fits a PieceId
        let conns = (0..catalog.len())
            .map(|piece| {
                std::array::from_fn(|side| {
                    std::array::from_fn(|o| {
                        catalog.connectivity(Placement::new(piece as u8, side as u8, o as u8))
                    })
                })
            })
            .collect();
        Self { catalog, conns }
    }

    fn connectivity(&self, placement: Placement) -> Connectivity {
        self.conns
            .get(placement.piece as usize)
            .map(|sides| sides[placement.side as usize][placement.orientation as usize])
            .unwrap_or_default()
    }

    /// Whether `candidate` at `pos` agrees with every placed neighbour
    fn fits(&self, cells: &[Option<Placement>; CELL_COUNT], pos: Position, candidate: Placement) -> bool {
        let conn = self.connectivity(candidate);
        Edge::ALL.into_iter().all(|edge| {
            let Some(next) = pos.neighbor(edge) else {
                return true;
            };
            match cells[next.index()] {
                Some(other) => conn.is_open(edge) == self.connectivity(other).is_open(edge.opposite()),
                None => true,
            }
        })
    }

    /// Pre-placed tiles must already agree with each other
    fn fixed_cells_agree(&self, cells: &[Option<Placement>; CELL_COUNT]) -> bool {
        Position::all().all(|pos| match cells[pos.index()] {
            Some(placement) => self.fits(cells, pos, placement),
            None => true,
        })
    }

    fn candidates(&self, used: &[bool]) -> Vec<Placement> {
        let mut out = Vec::new();
        for piece in (0..used.len()).filter(|&p| !used[p]) {
            for side in 0..SIDES_PER_PIECE as u8 {
                for orientation in 0..ORIENTATIONS {
                    out.push(Placement::new(piece as u8, side, orientation));
                }
            }
        }
        out
    }

    /// Visit every valid completion of `partial`. `order` may reorder the candidates
    /// tried at each cell. Returns the number of boards visited.
    pub fn search<S, F>(&self, partial: &Board, mut order: S, mut visit: F) -> usize
    where
        S: FnMut(&mut [Placement]),
        F: FnMut(&Board) -> ControlFlow<()>,
    {
        let mut cells = *partial.cells();
        if !self.fixed_cells_agree(&cells) {
            return 0;
        }

        let mut used = vec![false; self.catalog.len()];
        for placement in cells.iter().flatten() {
            if let Some(u) = used.get_mut(placement.piece as usize) {
                *u = true;
            }
        }

        let empty: Vec<Position> = Position::all()
            .filter(|pos| cells[pos.index()].is_none())
            .collect();

        let mut visited = 0;
        let _ = self.step(&mut cells, &mut used, &empty, &mut order, &mut visit, &mut visited);
        visited
    }

    fn step<S, F>(
        &self,
        cells: &mut [Option<Placement>; CELL_COUNT],
        used: &mut [bool],
        empty: &[Position],
        order: &mut S,
        visit: &mut F,
        visited: &mut usize,
    ) -> ControlFlow<()>
    where
        S: FnMut(&mut [Placement]),
        F: FnMut(&Board) -> ControlFlow<()>,
    {
        let Some((&pos, rest)) = empty.split_first() else {
            let board = Board::from_cells(*cells);
            if let Some(placements) = board.placements() {
                if check_cycles(&placements, self.catalog).is_ok() {
                    *visited += 1;
                    return visit(&board);
                }
            }
            return ControlFlow::Continue(());
        };

        let mut candidates = self.candidates(used);
        order(&mut candidates);

        for candidate in candidates {
            if !self.fits(cells, pos, candidate) {
                continue;
            }
            cells[pos.index()] = Some(candidate);
            used[candidate.piece as usize] = true;

            let flow = self.step(cells, used, rest, order, visit, visited);

            used[candidate.piece as usize] = false;
            cells[pos.index()] = None;
            flow?;
        }
        ControlFlow::Continue(())
    }
}

/// Visit every valid completion of `partial`, stopping early if `visit` breaks.
/// Returns the number of boards visited.
pub fn for_each_valid_board<F>(partial: &Board, catalog: &TileCatalog, visit: F) -> usize
where
    F: FnMut(&Board) -> ControlFlow<()>,
{
    Solver::new(catalog).search(partial, |_| {}, visit)
}

pub fn count_valid_boards(partial: &Board, catalog: &TileCatalog) -> usize {
    for_each_valid_board(partial, catalog, |_| ControlFlow::Continue(()))
}

/// First valid completion found with candidates tried in random order
pub fn random_valid_board_with_rng<R: Rng>(
    partial: &Board,
    catalog: &TileCatalog,
    rng: &mut R,
) -> Option<Board> {
    let mut found = None;
    Solver::new(catalog).search(
        partial,
        |candidates| candidates.shuffle(rng),
        |board| {
            found = Some(*board);
            ControlFlow::Break(())
        },
    );
    found
}

pub fn random_valid_board(partial: &Board, catalog: &TileCatalog) -> Option<Board> {
    let mut rng = rand::thread_rng();
    random_valid_board_with_rng(partial, catalog, &mut rng)
}
