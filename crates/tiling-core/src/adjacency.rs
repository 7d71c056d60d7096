//! Area adjacency: the largest orthogonally connected groups of tiles sharing a trait.

use crate::board::Placement;
use crate::geometry::{Position, CELL_COUNT};
use crate::tile::TileCatalog;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A per-cell scalar over the board, row-major
pub type CellGrid = [u32; CELL_COUNT];

/// Largest group sizes for each tracked trait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdjacencyStats {
    pub largest_dog_group: u32,
    pub largest_house_group: u32,
    pub largest_citizen_group: u32,
    pub largest_safe_zone_size: u32,
}

/// Size of the largest 4-connected group of cells with a positive value.
pub fn largest_component(grid: &CellGrid) -> u32 {
    let mut visited = [false; CELL_COUNT];
    let mut largest = 0;

    for start in Position::all() {
        if grid[start.index()] == 0 || visited[start.index()] {
            continue;
        }

        let mut size = 0;
        let mut queue = VecDeque::from([start]);
        visited[start.index()] = true;

        while let Some(cell) = queue.pop_front() {
            size += 1;
            for next in cell.neighbors() {
                if !visited[next.index()] && grid[next.index()] > 0 {
                    visited[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        largest = largest.max(size);
    }
    largest
}

/// Group sizes for dogs, houses, citizens and alien-free cells
pub fn adjacency_stats(placements: &[Placement; CELL_COUNT], catalog: &TileCatalog) -> AdjacencyStats {
    let faces = placements.map(|p| catalog.resolve(p));

    let dogs = faces.map(|f| f.dogs);
    let houses = faces.map(|f| f.houses);
    let citizens = faces.map(|f| f.citizens());
    let safe = faces.map(|f| u32::from(f.aliens == 0));

    AdjacencyStats {
        largest_dog_group: largest_component(&dogs),
        largest_house_group: largest_component(&houses),
        largest_citizen_group: largest_component(&citizens),
        largest_safe_zone_size: largest_component(&safe),
    }
}
