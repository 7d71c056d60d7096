//! Final board statistics.
//!
//! Combines tile totals, road network figures, derived products and adjacency group
//! sizes into one flat `BoardStats` record. `evaluate` is the single entry point for
//! callers holding a board that may still be incomplete or invalid.

use crate::adjacency::adjacency_stats;
use crate::board::{Board, Placement};
use crate::geometry::CELL_COUNT;
use crate::road_stats::analyze_road_network;
use crate::roads::build_roads;
use crate::tile::{Entity, TileCatalog};
use crate::validate::{validate, BoardError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every statistic reported for a valid board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    TotalHouses,
    TotalUfos,
    TotalGirls,
    TotalBoys,
    TotalDogs,
    TotalHamburgers,
    TotalAliens,
    TotalAgents,
    TotalCapturedAliens,
    TotalCurves,
    TotalTilesWithoutRoads,
    TotalRoads,
    MaxAliensRunningTowardsAgent,
    MaxHamburgersInFrontOfAlien,
    MaxAgentsOnOneRoad,
    MaxAliensOnOneRoad,
    MaxAliensBetweenTwoAgents,
    TotalFoodChainSets,
    LongestRoadSize,
    MaxRoadsOfSameLength,
    AliensTimesUfos,
    AliensTimesHamburgers,
    CitizenDogPairs,
    LargestDogGroup,
    LargestHouseGroup,
    LargestCitizenGroup,
    LargestSafeZoneSize,
}

impl StatKey {
    pub const ALL: [StatKey; 27] = [
        StatKey::TotalHouses,
        StatKey::TotalUfos,
        StatKey::TotalGirls,
        StatKey::TotalBoys,
        StatKey::TotalDogs,
        StatKey::TotalHamburgers,
        StatKey::TotalAliens,
        StatKey::TotalAgents,
        StatKey::TotalCapturedAliens,
        StatKey::TotalCurves,
        StatKey::TotalTilesWithoutRoads,
        StatKey::TotalRoads,
        StatKey::MaxAliensRunningTowardsAgent,
        StatKey::MaxHamburgersInFrontOfAlien,
        StatKey::MaxAgentsOnOneRoad,
        StatKey::MaxAliensOnOneRoad,
        StatKey::MaxAliensBetweenTwoAgents,
        StatKey::TotalFoodChainSets,
        StatKey::LongestRoadSize,
        StatKey::MaxRoadsOfSameLength,
        StatKey::AliensTimesUfos,
        StatKey::AliensTimesHamburgers,
        StatKey::CitizenDogPairs,
        StatKey::LargestDogGroup,
        StatKey::LargestHouseGroup,
        StatKey::LargestCitizenGroup,
        StatKey::LargestSafeZoneSize,
    ];

    /// Key as it appears in result maps and data files
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKey::TotalHouses => "total_houses",
            StatKey::TotalUfos => "total_ufos",
            StatKey::TotalGirls => "total_girls",
            StatKey::TotalBoys => "total_boys",
            StatKey::TotalDogs => "total_dogs",
            StatKey::TotalHamburgers => "total_hamburgers",
            StatKey::TotalAliens => "total_aliens",
            StatKey::TotalAgents => "total_agents",
            StatKey::TotalCapturedAliens => "total_captured_aliens",
            StatKey::TotalCurves => "total_curves",
            StatKey::TotalTilesWithoutRoads => "total_tiles_without_roads",
            StatKey::TotalRoads => "total_roads",
            StatKey::MaxAliensRunningTowardsAgent => "max_aliens_running_towards_agent",
            StatKey::MaxHamburgersInFrontOfAlien => "max_hamburgers_in_front_of_alien",
            StatKey::MaxAgentsOnOneRoad => "max_agents_on_one_road",
            StatKey::MaxAliensOnOneRoad => "max_aliens_on_one_road",
            StatKey::MaxAliensBetweenTwoAgents => "max_aliens_between_two_agents",
            StatKey::TotalFoodChainSets => "total_food_chain_sets",
            StatKey::LongestRoadSize => "longest_road_size",
            StatKey::MaxRoadsOfSameLength => "max_roads_of_same_length",
            StatKey::AliensTimesUfos => "aliens_times_ufos",
            StatKey::AliensTimesHamburgers => "aliens_times_hamburgers",
            StatKey::CitizenDogPairs => "citizen_dog_pairs",
            StatKey::LargestDogGroup => "largest_dog_group",
            StatKey::LargestHouseGroup => "largest_house_group",
            StatKey::LargestCitizenGroup => "largest_citizen_group",
            StatKey::LargestSafeZoneSize => "largest_safe_zone_size",
        }
    }

    /// The per-tile total this key sums, if it is one
    pub fn entity_total(entity: Entity) -> StatKey {
        match entity {
            Entity::Houses => StatKey::TotalHouses,
            Entity::Ufos => StatKey::TotalUfos,
            Entity::Girls => StatKey::TotalGirls,
            Entity::Boys => StatKey::TotalBoys,
            Entity::Dogs => StatKey::TotalDogs,
            Entity::Hamburgers => StatKey::TotalHamburgers,
            Entity::Aliens => StatKey::TotalAliens,
            Entity::Agents => StatKey::TotalAgents,
            Entity::Curves => StatKey::TotalCurves,
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stat key: {0}")]
pub struct UnknownStatKey(pub String);

impl FromStr for StatKey {
    type Err = UnknownStatKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownStatKey(s.to_string()))
    }
}

/// All statistics of a valid board.
///
/// Serializes as a flat map from stat key to value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoardStats {
    pub total_houses: u32,
    pub total_ufos: u32,
    pub total_girls: u32,
    pub total_boys: u32,
    pub total_dogs: u32,
    pub total_hamburgers: u32,
    pub total_aliens: u32,
    pub total_agents: u32,
    pub total_captured_aliens: u32,
    pub total_curves: u32,
    pub total_tiles_without_roads: u32,
    pub total_roads: u32,
    pub max_aliens_running_towards_agent: u32,
    pub max_hamburgers_in_front_of_alien: u32,
    pub max_agents_on_one_road: u32,
    pub max_aliens_on_one_road: u32,
    pub max_aliens_between_two_agents: u32,
    pub total_food_chain_sets: u32,
    pub longest_road_size: u32,
    pub max_roads_of_same_length: u32,
    pub aliens_times_ufos: u32,
    pub aliens_times_hamburgers: u32,
    pub citizen_dog_pairs: u32,
    pub largest_dog_group: u32,
    pub largest_house_group: u32,
    pub largest_citizen_group: u32,
    pub largest_safe_zone_size: u32,
}

impl BoardStats {
    pub fn get(&self, key: StatKey) -> u32 {
        match key {
            StatKey::TotalHouses => self.total_houses,
            StatKey::TotalUfos => self.total_ufos,
            StatKey::TotalGirls => self.total_girls,
            StatKey::TotalBoys => self.total_boys,
            StatKey::TotalDogs => self.total_dogs,
            StatKey::TotalHamburgers => self.total_hamburgers,
            StatKey::TotalAliens => self.total_aliens,
            StatKey::TotalAgents => self.total_agents,
            StatKey::TotalCapturedAliens => self.total_captured_aliens,
            StatKey::TotalCurves => self.total_curves,
            StatKey::TotalTilesWithoutRoads => self.total_tiles_without_roads,
            StatKey::TotalRoads => self.total_roads,
            StatKey::MaxAliensRunningTowardsAgent => self.max_aliens_running_towards_agent,
            StatKey::MaxHamburgersInFrontOfAlien => self.max_hamburgers_in_front_of_alien,
            StatKey::MaxAgentsOnOneRoad => self.max_agents_on_one_road,
            StatKey::MaxAliensOnOneRoad => self.max_aliens_on_one_road,
            StatKey::MaxAliensBetweenTwoAgents => self.max_aliens_between_two_agents,
            StatKey::TotalFoodChainSets => self.total_food_chain_sets,
            StatKey::LongestRoadSize => self.longest_road_size,
            StatKey::MaxRoadsOfSameLength => self.max_roads_of_same_length,
            StatKey::AliensTimesUfos => self.aliens_times_ufos,
            StatKey::AliensTimesHamburgers => self.aliens_times_hamburgers,
            StatKey::CitizenDogPairs => self.citizen_dog_pairs,
            StatKey::LargestDogGroup => self.largest_dog_group,
            StatKey::LargestHouseGroup => self.largest_house_group,
            StatKey::LargestCitizenGroup => self.largest_citizen_group,
            StatKey::LargestSafeZoneSize => self.largest_safe_zone_size,
        }
    }

    /// Every key with its value, in `StatKey::ALL` order
    pub fn entries(&self) -> Vec<(StatKey, u32)> {
        StatKey::ALL.into_iter().map(|k| (k, self.get(k))).collect()
    }

    /// Key-sorted map with string keys
    pub fn to_map(&self) -> BTreeMap<&'static str, u32> {
        StatKey::ALL
            .into_iter()
            .map(|k| (k.as_str(), self.get(k)))
            .collect()
    }
}

/// Statistics for a full board that has already passed validation.
pub fn aggregate(placements: &[Placement; CELL_COUNT], catalog: &TileCatalog) -> BoardStats {
    let faces = placements.map(|p| catalog.resolve(p));
    let total = |entity: Entity| {
        faces
            .iter()
            .fold(0u32, |sum, f| sum.saturating_add(f.count(entity)))
    };

    let network = analyze_road_network(&build_roads(placements, catalog));
    let adjacency = adjacency_stats(placements, catalog);

    let total_aliens = total(Entity::Aliens);
    let total_ufos = total(Entity::Ufos);
    let total_hamburgers = total(Entity::Hamburgers);
    let total_boys = total(Entity::Boys);
    let total_girls = total(Entity::Girls);
    let total_dogs = total(Entity::Dogs);
    let free_aliens = total_aliens.saturating_sub(network.aliens_caught);

    BoardStats {
        total_houses: total(Entity::Houses),
        total_ufos,
        total_girls,
        total_boys,
        total_dogs,
        total_hamburgers,
        total_aliens,
        total_agents: total(Entity::Agents),
        total_captured_aliens: network.aliens_caught,
        total_curves: total(Entity::Curves),
        total_tiles_without_roads: faces.iter().filter(|f| !f.has_roads()).count() as u32,
        total_roads: network.total_roads,
        max_aliens_running_towards_agent: network.max_aliens_running_towards_agent,
        max_hamburgers_in_front_of_alien: network.max_hamburgers_in_front_of_alien,
        max_agents_on_one_road: network.max_agents_on_one_road,
        max_aliens_on_one_road: network.max_aliens_on_one_road,
        max_aliens_between_two_agents: network.max_aliens_between_two_agents,
        total_food_chain_sets: network.total_food_chain_sets,
        longest_road_size: network.longest_road_size,
        max_roads_of_same_length: network.max_roads_of_same_length,
        aliens_times_ufos: free_aliens.saturating_mul(total_ufos),
        aliens_times_hamburgers: free_aliens.saturating_mul(total_hamburgers),
        citizen_dog_pairs: total_boys.saturating_add(total_girls).min(total_dogs),
        largest_dog_group: adjacency.largest_dog_group,
        largest_house_group: adjacency.largest_house_group,
        largest_citizen_group: adjacency.largest_citizen_group,
        largest_safe_zone_size: adjacency.largest_safe_zone_size,
    }
}

/// Validate, then compute statistics.
pub fn analyze(board: &Board, catalog: &TileCatalog) -> Result<BoardStats, BoardError> {
    validate(board, catalog)?;
    let placements = board.placements().ok_or_else(|| BoardError::Incomplete {
        empty_cells: board.empty_cells(),
    })?;
    Ok(aggregate(&placements, catalog))
}

/// Outcome of looking at a board snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    /// Some cells are still empty; nothing was analyzed
    Incomplete { empty_cells: Vec<usize> },
    /// The board breaks a placement rule
    Invalid { error: String },
    Valid { stats: BoardStats },
}

impl Evaluation {
    pub fn stats(&self) -> Option<&BoardStats> {
        match self {
            Evaluation::Valid { stats } => Some(stats),
            _ => None,
        }
    }
}

/// Classify a board and, when it is valid, score it.
pub fn evaluate(board: &Board, catalog: &TileCatalog) -> Evaluation {
    match analyze(board, catalog) {
        Ok(stats) => Evaluation::Valid { stats },
        Err(BoardError::Incomplete { empty_cells }) => Evaluation::Incomplete { empty_cells },
        Err(e) => Evaluation::Invalid {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Edge, Position};
    use crate::tile::{Item, RoadSegment, TileSide};

    fn face(roads: Vec<RoadSegment>) -> TileSide {
        TileSide {
            roads,
            ..Default::default()
        }
    }

    #[test]
    fn test_stat_key_round_trips_through_str() {
        for key in StatKey::ALL {
            assert_eq!(key.as_str().parse::<StatKey>(), Ok(key));
            assert_eq!(
                serde_json::to_string(&key).unwrap(),
                format!("\"{}\"", key.as_str())
            );
        }
        assert!("total_spaceships".parse::<StatKey>().is_err());
    }

    #[test]
    fn test_serialized_stats_are_a_flat_map_of_all_keys() {
        let value = serde_json::to_value(BoardStats::default()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), StatKey::ALL.len());
        for key in StatKey::ALL {
            assert_eq!(object.get(key.as_str()), Some(&serde_json::json!(0)));
        }
    }

    #[test]
    fn test_entries_follow_key_order() {
        let stats = BoardStats {
            total_roads: 4,
            ..Default::default()
        };
        let entries = stats.entries();
        assert_eq!(entries.len(), 27);
        assert_eq!(entries[11], (StatKey::TotalRoads, 4));
        assert_eq!(stats.to_map()["total_roads"], 4);
    }

    #[test]
    fn test_citizen_dog_pairs_is_the_smaller_total() {
        let kids = TileSide {
            boys: 2,
            girls: 1,
            ..Default::default()
        };
        let dogs = TileSide {
            dogs: 1,
            ..Default::default()
        };
        let catalog = TileCatalog::from_pieces(vec![
            [kids, TileSide::default()],
            [dogs, TileSide::default()],
        ])
        .unwrap();

        // 3 kid tiles and 2 dog tiles, the rest blank
        let placements: [Placement; CELL_COUNT] = std::array::from_fn(|i| match i {
            0..=2 => Placement::new(0, 0, 0),
            3 | 4 => Placement::new(1, 0, 0),
            _ => Placement::new(0, 1, 0),
        });
        let stats = aggregate(&placements, &catalog);
        assert_eq!(stats.total_boys + stats.total_girls, 9);
        assert_eq!(stats.total_dogs, 2);
        assert_eq!(stats.citizen_dog_pairs, 2);

        // No dogs at all
        let no_dogs = [Placement::new(0, 0, 0); CELL_COUNT];
        assert_eq!(aggregate(&no_dogs, &catalog).citizen_dog_pairs, 0);
    }

    #[test]
    fn test_derived_alien_products_use_free_aliens() {
        let agent = TileSide {
            roads: vec![RoadSegment::with_item(
                Edge::Left,
                Edge::Right,
                Item::Agent,
                Some(Edge::Right),
            )],
            agents: 1,
            ..Default::default()
        };
        let alien = TileSide {
            roads: vec![RoadSegment::with_item(
                Edge::Left,
                Edge::Right,
                Item::Alien,
                Some(Edge::Right),
            )],
            aliens: 1,
            ..Default::default()
        };
        let ufo_burger = TileSide {
            ufos: 2,
            hamburgers: 3,
            aliens: 1,
            ..Default::default()
        };
        let straight = face(vec![RoadSegment::new(Edge::Left, Edge::Right)]);
        let catalog = TileCatalog::from_pieces(vec![
            [agent, TileSide::default()],
            [alien, TileSide::default()],
            [ufo_burger, TileSide::default()],
            [straight, TileSide::default()],
        ])
        .unwrap();

        // Middle row: agent -> alien -> straight; everything else the ufo/burger tile
        let placements: [Placement; CELL_COUNT] = std::array::from_fn(|i| match i {
            3 => Placement::new(0, 0, 0),
            4 => Placement::new(1, 0, 0),
            5 => Placement::new(3, 0, 0),
            _ => Placement::new(2, 0, 0),
        });
        let mut board = Board::new();
        for (pos, p) in Position::all().zip(placements) {
            board.set(pos, Some(p));
        }

        let stats = analyze(&board, &catalog).unwrap();
        assert_eq!(stats.total_aliens, 7);
        assert_eq!(stats.total_captured_aliens, 1);
        assert_eq!(stats.total_ufos, 12);
        assert_eq!(stats.total_hamburgers, 18);
        assert_eq!(stats.aliens_times_ufos, 6 * 12);
        assert_eq!(stats.aliens_times_hamburgers, 6 * 18);
        assert_eq!(stats.total_roads, 1);
        assert_eq!(stats.longest_road_size, 3);
        assert_eq!(stats.total_tiles_without_roads, 6);
        assert_eq!(stats.largest_safe_zone_size, 1);
    }

    #[test]
    fn test_large_counts_saturate() {
        let crowded = TileSide {
            aliens: 100_000,
            ufos: 100_000,
            hamburgers: u32::MAX,
            boys: u32::MAX,
            girls: 1,
            dogs: 5,
            ..Default::default()
        };
        let catalog = TileCatalog::from_pieces(vec![[crowded, TileSide::default()]]).unwrap();
        let board = Board::from_cells([Some(Placement::new(0, 0, 0)); CELL_COUNT]);

        let stats = evaluate(&board, &catalog)
            .stats()
            .copied()
            .unwrap();
        assert_eq!(stats.total_aliens, 900_000);
        assert_eq!(stats.total_ufos, 900_000);
        assert_eq!(stats.total_hamburgers, u32::MAX);
        assert_eq!(stats.total_boys, u32::MAX);
        assert_eq!(stats.total_girls, 9);
        assert_eq!(stats.aliens_times_ufos, u32::MAX);
        assert_eq!(stats.aliens_times_hamburgers, u32::MAX);
        assert_eq!(stats.citizen_dog_pairs, 45);
        assert_eq!(stats.largest_citizen_group, 9);
    }

    #[test]
    fn test_evaluate_distinguishes_outcomes() {
        let straight = face(vec![RoadSegment::new(Edge::Left, Edge::Right)]);
        let catalog =
            TileCatalog::from_pieces(vec![[straight, TileSide::default()]]).unwrap();

        let mut board = Board::new();
        assert_eq!(
            evaluate(&board, &catalog),
            Evaluation::Incomplete {
                empty_cells: (0..9).collect()
            }
        );

        for pos in Position::all() {
            board.set(pos, Some(Placement::new(0, 1, 0)));
        }
        assert!(matches!(evaluate(&board, &catalog), Evaluation::Valid { .. }));

        board.set(Position::new(4).unwrap(), Some(Placement::new(0, 0, 0)));
        assert!(matches!(evaluate(&board, &catalog), Evaluation::Invalid { .. }));
    }

    #[test]
    fn test_evaluation_json_is_tagged() {
        let json = serde_json::to_value(Evaluation::Invalid {
            error: "Cycle detected in the road network".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["error"], "Cycle detected in the road network");
    }
}
