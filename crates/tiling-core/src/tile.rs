//! Tile definitions and the tile catalog.
//!
//! This module contains:
//! - Item types carried on road segments
//! - Road segments and tile faces (`TileSide`)
//! - Entity counts used for totals and adjacency scoring
//! - The read-only `TileCatalog`, indexed by piece id then side
//! - Connectivity resolution for a face at a given orientation

use crate::board::Placement;
use crate::geometry::Edge;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Number of faces on every piece
pub const SIDES_PER_PIECE: usize = 2;

/// Piece ids are `u8`
pub const MAX_PIECES: usize = u8::MAX as usize + 1;

/// Something standing on a road segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    /// Bare road
    #[default]
    #[serde(rename = "", alias = "none")]
    None,
    /// Hunts aliens in the direction it faces
    Agent,
    /// Runs in the direction it faces, eating hamburgers
    Alien,
    Hamburger,
}

/// Countable things printed on a tile face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Houses,
    Ufos,
    Girls,
    Boys,
    Dogs,
    Hamburgers,
    Aliens,
    Agents,
    Curves,
}

impl Entity {
    /// All entity kinds, in the order their totals are reported
    pub const ALL: [Entity; 9] = [
        Entity::Houses,
        Entity::Ufos,
        Entity::Girls,
        Entity::Boys,
        Entity::Dogs,
        Entity::Hamburgers,
        Entity::Aliens,
        Entity::Agents,
        Entity::Curves,
    ];

    /// Catalog field name of this entity
    pub fn name(&self) -> &'static str {
        match self {
            Entity::Houses => "houses",
            Entity::Ufos => "ufos",
            Entity::Girls => "girls",
            Entity::Boys => "boys",
            Entity::Dogs => "dogs",
            Entity::Hamburgers => "hamburgers",
            Entity::Aliens => "aliens",
            Entity::Agents => "agents",
            Entity::Curves => "curves",
        }
    }
}

/// A road piece printed on a tile face, joining two of its edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// The two edges this segment runs between (unrotated)
    pub connection: [Edge; 2],
    /// What stands on the segment
    #[serde(default, deserialize_with = "item_or_none")]
    pub item: Item,
    /// Edge the item is facing, if it faces anywhere
    #[serde(default)]
    pub direction: Option<Edge>,
}

impl RoadSegment {
    /// A segment with nothing on it
    pub fn new(a: Edge, b: Edge) -> Self {
        Self {
            connection: [a, b],
            item: Item::None,
            direction: None,
        }
    }

    /// A segment carrying an item that faces `towards`
    pub fn with_item(a: Edge, b: Edge, item: Item, towards: Option<Edge>) -> Self {
        Self {
            connection: [a, b],
            item,
            direction: towards,
        }
    }
}

fn item_or_none<'de, D>(deserializer: D) -> Result<Item, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Item>::deserialize(deserializer)?.unwrap_or_default())
}

/// One face of a piece.
///
/// Every field is optional in the catalog file; missing roads mean a roadless face and
/// missing counts are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSide {
    pub roads: Vec<RoadSegment>,
    pub houses: u32,
    pub ufos: u32,
    pub girls: u32,
    pub boys: u32,
    pub dogs: u32,
    pub hamburgers: u32,
    pub aliens: u32,
    pub agents: u32,
    pub curves: u32,
}

static EMPTY_SIDE: TileSide = TileSide {
    roads: Vec::new(),
    houses: 0,
    ufos: 0,
    girls: 0,
    boys: 0,
    dogs: 0,
    hamburgers: 0,
    aliens: 0,
    agents: 0,
    curves: 0,
};

impl TileSide {
    /// A face with no roads and no entities
    pub fn empty() -> &'static TileSide {
        &EMPTY_SIDE
    }

    /// Count of one entity kind on this face
    pub fn count(&self, entity: Entity) -> u32 {
        match entity {
            Entity::Houses => self.houses,
            Entity::Ufos => self.ufos,
            Entity::Girls => self.girls,
            Entity::Boys => self.boys,
            Entity::Dogs => self.dogs,
            Entity::Hamburgers => self.hamburgers,
            Entity::Aliens => self.aliens,
            Entity::Agents => self.agents,
            Entity::Curves => self.curves,
        }
    }

    /// Boys and girls together
    pub fn citizens(&self) -> u32 {
        self.boys.saturating_add(self.girls)
    }

    pub fn has_roads(&self) -> bool {
        !self.roads.is_empty()
    }

    /// Which edges carry a road once the face is turned `orientation` quarter-turns
    pub fn connectivity(&self, orientation: u8) -> Connectivity {
        let mut open = [false; 4];
        for road in &self.roads {
            for edge in road.connection {
                open[edge.rotated(orientation).index()] = true;
            }
        }
        Connectivity(open)
    }

    fn check(&self, piece: usize, side: usize) -> Result<(), CatalogError> {
        for road in &self.roads {
            let [a, b] = road.connection;
            if a == b {
                return Err(CatalogError::DegenerateSegment { piece, side });
            }
            if let Some(dir) = road.direction {
                if dir != a && dir != b {
                    return Err(CatalogError::FacingOffSegment { piece, side });
                }
            }
        }
        Ok(())
    }
}

/// Road presence on each edge, indexed `[left, top, right, bottom]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Connectivity(pub [bool; 4]);

impl Connectivity {
    pub fn is_open(&self, edge: Edge) -> bool {
        self.0[edge.index()]
    }

    /// The same pattern turned `turns` further quarter-turns clockwise
    pub fn rotated(&self, turns: u8) -> Connectivity {
        let mut open = [false; 4];
        for edge in Edge::ALL {
            open[edge.rotated(turns).index()] = self.is_open(edge);
        }
        Connectivity(open)
    }

    /// As 0/1 flags
    pub fn bits(&self) -> [u8; 4] {
        self.0.map(u8::from)
    }
}

/// Errors raised while loading a tile catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid tile catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog has {0} pieces, at most 256 are supported")]
    TooManyPieces(usize),

    #[error("Piece {piece} has {found} sides, expected 2")]
    WrongSideCount { piece: usize, found: usize },

    #[error("Piece {piece} (side {side}) has a road joining an edge to itself")]
    DegenerateSegment { piece: usize, side: usize },

    #[error("Piece {piece} (side {side}) has an item facing an edge its road does not touch")]
    FacingOffSegment { piece: usize, side: usize },
}

/// All piece definitions, indexed by piece id then side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<Vec<TileSide>>")]
pub struct TileCatalog {
    pieces: Vec<[TileSide; SIDES_PER_PIECE]>,
}

impl TileCatalog {
    /// Build a catalog from already-parsed pieces
    pub fn from_pieces(pieces: Vec<[TileSide; SIDES_PER_PIECE]>) -> Result<Self, CatalogError> {
        if pieces.len() > MAX_PIECES {
            return Err(CatalogError::TooManyPieces(pieces.len()));
        }
        for (piece, sides) in pieces.iter().enumerate() {
            for (side, face) in sides.iter().enumerate() {
                face.check(piece, side)?;
            }
        }
        Ok(Self { pieces })
    }

    /// Parse the catalog file: an array of pieces, each an array of two faces
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<Vec<TileSide>> = serde_json::from_str(json)?;
        let mut pieces = Vec::with_capacity(raw.len());
        for (piece, sides) in raw.into_iter().enumerate() {
            let found = sides.len();
            let pair: [TileSide; SIDES_PER_PIECE] = sides
                .try_into()
                .map_err(|_| CatalogError::WrongSideCount { piece, found })?;
            pieces.push(pair);
        }
        Self::from_pieces(pieces)
    }

    /// Number of pieces
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// The face for a piece and side, if the catalog defines it
    pub fn side(&self, piece: u8, side: u8) -> Option<&TileSide> {
        self.pieces
            .get(piece as usize)
            .and_then(|sides| sides.get(side as usize))
    }

    /// The face a placement shows; undefined faces resolve to an empty face
    pub fn resolve(&self, placement: Placement) -> &TileSide {
        self.side(placement.piece, placement.side)
            .unwrap_or(TileSide::empty())
    }

    /// Connectivity of a placed tile
    pub fn connectivity(&self, placement: Placement) -> Connectivity {
        self.resolve(placement).connectivity(placement.orientation)
    }
}

impl From<TileCatalog> for Vec<Vec<TileSide>> {
    fn from(catalog: TileCatalog) -> Self {
        catalog.pieces.into_iter().map(Vec::from).collect()
    }
}
