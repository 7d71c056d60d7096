//! Tiling - analysis engine for a 3x3 board of double-sided road tiles
//!
//! This crate provides the board logic:
//! - Tile catalog and grid geometry (edges, junction nodes, rotation)
//! - Board validation: edge matching between neighbours and road loop detection
//! - Road reconstruction and item simulation along each road
//! - Area adjacency groups and the final statistics record
//! - Objective cards, percentile scoring and optimal-board lookup
//! - Exhaustive and randomized search for valid boards
//!
//! # Architecture
//!
//! The engine is pure and platform-agnostic: every entry point takes a board snapshot and
//! a catalog and returns data. It can be compiled to:
//! - Native Rust for the analysis service
//! - WebAssembly for the browser front end (`wasm` feature)
//!
//! # Modules
//!
//! - [`geometry`]: Grid positions, edge directions and the junction node table
//! - [`tile`]: Tile faces, road segments and the catalog
//! - [`board`]: Placements and the board snapshot
//! - [`validate`]: Board validation
//! - [`roads`]: Road reconstruction
//! - [`road_stats`]: Per-road item simulation
//! - [`adjacency`]: Largest connected groups of tiles
//! - [`stats`]: Statistics aggregation and evaluation
//! - [`objectives`]: Objective cards and scoring
//! - [`solver`]: Valid-board search

pub mod adjacency;
pub mod board;
pub mod geometry;
pub mod objectives;
pub mod road_stats;
pub mod roads;
pub mod solver;
pub mod stats;
pub mod tile;
pub mod validate;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use adjacency::{adjacency_stats, AdjacencyStats};
pub use board::{Board, PieceId, Placement};
pub use geometry::{Edge, Position, CELL_COUNT, GRID_SIZE, NODE_COUNT};
pub use objectives::{
    card_score, ranked_stats, selection_scores, CardDeck, CardId, CardScore, CardSelection, Goal,
    ObjectiveCard, ObjectiveError, OptimalBoards, PercentileTable,
};
pub use road_stats::{analyze_road_network, NetworkStats, RoadStats};
pub use roads::{build_roads, Facing, Road, RoadCell};
pub use solver::{count_valid_boards, for_each_valid_board, random_valid_board, random_valid_board_with_rng};
pub use stats::{analyze, evaluate, BoardStats, Evaluation, StatKey};
pub use tile::{
    CatalogError, Connectivity, Entity, Item, RoadSegment, TileCatalog, TileSide, MAX_PIECES,
};
pub use validate::{validate, validation, BoardError, Validation};
