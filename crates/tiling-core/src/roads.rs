//! Road reconstruction from the junction graph.
//!
//! Every road segment of every placed tile becomes an undirected edge between the two
//! junction nodes it touches. Each connected component of that graph is one physical
//! road. Since the validator has already rejected loops, every component is a simple
//! path, which is walked from one end to produce the ordered list of cells along it.
//!
//! Item metadata is keyed by the unordered node pair of its segment. Two tiles never
//! share both endpoints of a segment, so the pair identifies the segment uniquely and no
//! extra per-tile nodes are needed.

use crate::board::Placement;
use crate::geometry::{Position, CELL_COUNT, NODE_COUNT};
use crate::tile::{Item, TileCatalog};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Which way an item on a road cell is facing, relative to the road's cell order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Towards higher cell indices
    Forward,
    /// Towards lower cell indices
    Backward,
    /// Not facing anywhere
    #[default]
    None,
}

/// One tile segment along a road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoadCell {
    pub item: Item,
    pub facing: Facing,
}

impl RoadCell {
    pub const fn new(item: Item, facing: Facing) -> Self {
        Self { item, facing }
    }

    pub const fn empty() -> Self {
        Self::new(Item::None, Facing::None)
    }
}

/// A maximal road, as the ordered cells from one end to the other
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Road {
    pub cells: Vec<RoadCell>,
}

impl Road {
    pub fn new(cells: Vec<RoadCell>) -> Self {
        Self { cells }
    }

    /// Number of tile segments on the road
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// What a segment carries, keyed by its node pair
#[derive(Debug, Clone, Copy)]
struct SegmentInfo {
    item: Item,
    /// Junction node the item is facing
    ahead: Option<usize>,
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// The road graph of one board
#[derive(Debug, Clone)]
pub struct RoadGraph {
    adjacency: Vec<Vec<usize>>,
    segments: HashMap<(usize, usize), SegmentInfo>,
}

impl RoadGraph {
    /// Build the graph for a full board
    pub fn build(placements: &[Placement; CELL_COUNT], catalog: &TileCatalog) -> Self {
        let mut adjacency = vec![Vec::new(); NODE_COUNT];
        let mut segments = HashMap::new();

        for (pos, placement) in Position::all().zip(placements.iter()) {
            for road in &catalog.resolve(*placement).roads {
                let [a, b] = road.connection;
                let g1 = pos.junction(a.rotated(placement.orientation));
                let g2 = pos.junction(b.rotated(placement.orientation));
                adjacency[g1].push(g2);
                adjacency[g2].push(g1);

                let ahead = road
                    .direction
                    .map(|d| pos.junction(d.rotated(placement.orientation)));
                segments.insert(
                    edge_key(g1, g2),
                    SegmentInfo {
                        item: road.item,
                        ahead,
                    },
                );
            }
        }

        Self {
            adjacency,
            segments,
        }
    }

    /// Nodes touched by at least one segment
    pub fn road_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.adjacency.len()).filter(|&n| !self.adjacency[n].is_empty())
    }

    /// Split the graph into roads, in discovery order of their lowest node
    pub fn roads(&self) -> Vec<Road> {
        let mut visited = vec![false; self.adjacency.len()];
        let mut roads = Vec::new();

        for start in self.road_nodes() {
            if visited[start] {
                continue;
            }
            let component = self.component_from(start, &mut visited);
            let path = self.linearize(&component);
            roads.push(self.cells_along(&path));
        }

        roads
    }

    /// Breadth-first search; returns the nodes in visit order
    fn component_from(&self, start: usize, visited: &mut [bool]) -> Vec<usize> {
        let mut order = Vec::new();
        let mut queue = VecDeque::from([start]);
        visited[start] = true;

        while let Some(u) = queue.pop_front() {
            order.push(u);
            for &v in &self.adjacency[u] {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        order
    }

    /// Walk a path-shaped component from one end.
    ///
    /// Requires a loop-free board: each node then has at most two neighbours and the walk
    /// visits every node exactly once. A loop has no endpoint, so the walk starts at its
    /// smallest node and the closing segment is not part of the result.
    fn linearize(&self, component: &[usize]) -> Vec<usize> {
        let start = component
            .iter()
            .copied()
            .find(|&n| self.adjacency[n].len() == 1)
            .or_else(|| component.iter().copied().min())
            .unwrap_or_default();

        let mut path = vec![start];
        let mut prev: Option<usize> = None;
        let mut curr = start;

        while path.len() < component.len() {
            let next = self.adjacency[curr]
                .iter()
                .copied()
                .find(|&n| Some(n) != prev);
            match next {
                Some(n) => {
                    path.push(n);
                    prev = Some(curr);
                    curr = n;
                }
                None => break,
            }
        }
        path
    }

    fn cells_along(&self, path: &[usize]) -> Road {
        let cells = path
            .windows(2)
            .filter_map(|pair| {
                let (u, v) = (pair[0], pair[1]);
                self.segments.get(&edge_key(u, v)).map(|info| {
                    let facing = match info.ahead {
                        Some(node) if node == v => Facing::Forward,
                        Some(_) => Facing::Backward,
                        None => Facing::None,
                    };
                    RoadCell::new(info.item, facing)
                })
            })
            .collect();
        Road::new(cells)
    }
}

/// Reconstruct every road of a valid board.
pub fn build_roads(placements: &[Placement; CELL_COUNT], catalog: &TileCatalog) -> Vec<Road> {
    RoadGraph::build(placements, catalog).roads()
}
