//! Item simulation along roads.
//!
//! Agents capture the nearest alien ahead of them, aliens run towards hamburgers, and
//! agent → alien → hamburger runs form food chains. Each road is scored on its own and
//! the per-road figures are then summed or maxed across the network.

use crate::roads::{Facing, Road};
use crate::tile::Item;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

/// The ordered pattern counted as one food chain
const FOOD_CHAIN: [Item; 3] = [Item::Agent, Item::Alien, Item::Hamburger];

/// An agent or alien at a cell of the road
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Actor {
    pos: usize,
    facing: Facing,
}

/// Figures for a single road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoadStats {
    pub num_agents: u32,
    pub num_aliens: u32,
    pub aliens_caught: u32,
    pub max_aliens_running_towards_agent: u32,
    pub max_hamburgers_in_front_of_alien: u32,
    pub max_aliens_between_two_agents: u32,
    pub food_chain_sets: u32,
}

impl RoadStats {
    /// Score one road
    pub fn analyze(road: &Road) -> Self {
        let agents = actors(road, Item::Agent);
        let aliens = actors(road, Item::Alien);
        let captured = captured_aliens(&agents, &aliens);

        Self {
            num_agents: agents.len() as u32,
            num_aliens: aliens.len() as u32,
            aliens_caught: captured.len() as u32,
            max_aliens_running_towards_agent: max_aliens_running_towards_agent(&agents, &aliens),
            max_hamburgers_in_front_of_alien: max_hamburgers_in_front_of_alien(
                road, &aliens, &captured,
            ),
            max_aliens_between_two_agents: max_aliens_between_two_agents(road, &agents),
            food_chain_sets: food_chain_sets(road),
        }
    }
}

fn actors(road: &Road, item: Item) -> Vec<Actor> {
    road.cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| cell.item == item)
        .map(|(pos, cell)| Actor {
            pos,
            facing: cell.facing,
        })
        .collect()
}

/// Positions of aliens captured by agents.
///
/// Agents act from the start of the road onwards; each takes the nearest alien still
/// free on the side it faces.
fn captured_aliens(agents: &[Actor], aliens: &[Actor]) -> BTreeSet<usize> {
    let mut captured = BTreeSet::new();
    let mut ordered = agents.to_vec();
    ordered.sort_by_key(|a| a.pos);

    for agent in ordered {
        let free = aliens.iter().map(|a| a.pos).filter(|p| !captured.contains(p));
        let target = match agent.facing {
            Facing::Forward => free.filter(|&p| p > agent.pos).min(),
            Facing::Backward => free.filter(|&p| p < agent.pos).max(),
            Facing::None => None,
        };
        if let Some(pos) = target {
            captured.insert(pos);
        }
    }
    captured
}

/// Aliens heading towards some agent, counted per direction; the larger side wins.
fn max_aliens_running_towards_agent(agents: &[Actor], aliens: &[Actor]) -> u32 {
    let mut right = 0;
    let mut left = 0;
    for alien in aliens {
        match alien.facing {
            Facing::Forward if agents.iter().any(|a| a.pos > alien.pos) => right += 1,
            Facing::Backward if agents.iter().any(|a| a.pos < alien.pos) => left += 1,
            _ => {}
        }
    }
    right.max(left)
}

/// Most hamburgers any free alien can see ahead, up to the next free alien running the
/// same way.
fn max_hamburgers_in_front_of_alien(
    road: &Road,
    aliens: &[Actor],
    captured: &BTreeSet<usize>,
) -> u32 {
    let blocks = |i: usize, facing: Facing| {
        let cell = road.cells[i];
        cell.item == Item::Alien && cell.facing == facing && !captured.contains(&i)
    };

    let mut best = 0;
    for alien in aliens.iter().filter(|a| !captured.contains(&a.pos)) {
        let ahead: Vec<usize> = match alien.facing {
            Facing::Forward => (alien.pos + 1..road.len()).collect(),
            Facing::Backward => (0..alien.pos).rev().collect(),
            Facing::None => continue,
        };

        let mut burgers = 0;
        for i in ahead {
            if road.cells[i].item == Item::Hamburger {
                burgers += 1;
            } else if blocks(i, alien.facing) {
                break;
            }
        }
        best = best.max(burgers);
    }
    best
}

/// Most aliens trapped between two agents facing each other.
fn max_aliens_between_two_agents(road: &Road, agents: &[Actor]) -> u32 {
    let mut best = 0;
    for left in agents.iter().filter(|a| a.facing == Facing::Forward) {
        for right in agents.iter().filter(|a| a.facing == Facing::Backward) {
            if left.pos >= right.pos {
                continue;
            }
            let between = road.cells[left.pos + 1..right.pos]
                .iter()
                .filter(|c| c.item == Item::Alien)
                .count() as u32;
            best = best.max(between);
        }
    }
    best
}

/// Count agent → alien → hamburger runs read forwards, then hamburger → alien → agent
/// runs among the cells the forward pass left unused. Bare cells are skipped.
fn food_chain_sets(road: &Road) -> u32 {
    let items: Vec<Item> = road.cells.iter().map(|c| c.item).collect();
    let mut used = HashSet::new();

    let forward = match_pattern(&items, &FOOD_CHAIN, |_| false, Some(&mut used));

    let mut reversed = FOOD_CHAIN;
    reversed.reverse();
    let backward = match_pattern(&items, &reversed, |i| used.contains(&i), None);

    forward + backward
}

/// Greedy left-to-right match of `pattern` over the non-empty items.
///
/// A mismatching item that equals the pattern's first element restarts the match on it.
fn match_pattern(
    items: &[Item],
    pattern: &[Item],
    skip: impl Fn(usize) -> bool,
    mut used: Option<&mut HashSet<usize>>,
) -> u32 {
    let mut sets = 0;
    let mut matched = 0;
    let mut current = Vec::with_capacity(pattern.len());

    for (i, &item) in items.iter().enumerate() {
        if item == Item::None || skip(i) {
            continue;
        }
        if item == pattern[matched] {
            current.push(i);
            matched += 1;
        } else {
            current.clear();
            if item == pattern[0] {
                current.push(i);
                matched = 1;
            } else {
                matched = 0;
            }
        }
        if matched == pattern.len() {
            sets += 1;
            if let Some(used) = used.as_deref_mut() {
                used.extend(current.iter().copied());
            }
            matched = 0;
            current.clear();
        }
    }
    sets
}

/// Figures for the whole road network of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetworkStats {
    pub total_roads: u32,
    pub aliens_caught: u32,
    pub max_aliens_running_towards_agent: u32,
    pub max_hamburgers_in_front_of_alien: u32,
    pub max_agents_on_one_road: u32,
    pub max_aliens_on_one_road: u32,
    pub max_aliens_between_two_agents: u32,
    pub total_food_chain_sets: u32,
    pub longest_road_size: u32,
    pub max_roads_of_same_length: u32,
}

/// Score every road and combine: captures and food chains add up, the rest take the
/// best road.
pub fn analyze_road_network(roads: &[Road]) -> NetworkStats {
    let mut agg = NetworkStats {
        total_roads: roads.len() as u32,
        ..Default::default()
    };

    let mut lengths: HashMap<usize, u32> = HashMap::new();
    for road in roads {
        *lengths.entry(road.len()).or_default() += 1;
        if road.is_empty() {
            continue;
        }

        let stats = RoadStats::analyze(road);
        agg.aliens_caught += stats.aliens_caught;
        agg.total_food_chain_sets += stats.food_chain_sets;
        agg.max_hamburgers_in_front_of_alien = agg
            .max_hamburgers_in_front_of_alien
            .max(stats.max_hamburgers_in_front_of_alien);
        agg.max_aliens_running_towards_agent = agg
            .max_aliens_running_towards_agent
            .max(stats.max_aliens_running_towards_agent);
        agg.max_agents_on_one_road = agg.max_agents_on_one_road.max(stats.num_agents);
        agg.max_aliens_on_one_road = agg.max_aliens_on_one_road.max(stats.num_aliens);
        agg.max_aliens_between_two_agents = agg
            .max_aliens_between_two_agents
            .max(stats.max_aliens_between_two_agents);
    }

    agg.longest_road_size = lengths.keys().copied().max().unwrap_or(0) as u32;
    agg.max_roads_of_same_length = lengths.values().copied().max().unwrap_or(0);
    agg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roads::RoadCell;
    use pretty_assertions::assert_eq;

    const AGENT_F: RoadCell = RoadCell::new(Item::Agent, Facing::Forward);
    const AGENT_B: RoadCell = RoadCell::new(Item::Agent, Facing::Backward);
    const ALIEN_F: RoadCell = RoadCell::new(Item::Alien, Facing::Forward);
    const ALIEN_B: RoadCell = RoadCell::new(Item::Alien, Facing::Backward);
    const BURGER: RoadCell = RoadCell::new(Item::Hamburger, Facing::None);
    const BARE: RoadCell = RoadCell::empty();

    fn road(cells: &[RoadCell]) -> Road {
        Road::new(cells.to_vec())
    }

    #[test]
    fn test_agent_captures_alien_ahead() {
        let stats = RoadStats::analyze(&road(&[AGENT_F, ALIEN_F, BURGER, BURGER]));
        assert_eq!(stats.aliens_caught, 1);
        // The only alien is caught, so nobody is left to chase the hamburgers
        assert_eq!(stats.max_hamburgers_in_front_of_alien, 0);
    }

    #[test]
    fn test_capture_takes_nearest_free_alien() {
        // First agent takes the alien at 2, the second the one at 3
        let r = road(&[AGENT_F, AGENT_F, ALIEN_F, ALIEN_B, BARE]);
        let agents = actors(&r, Item::Agent);
        let aliens = actors(&r, Item::Alien);
        let captured = captured_aliens(&agents, &aliens);
        assert_eq!(captured.into_iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_backward_agent_captures_behind() {
        let r = road(&[ALIEN_F, ALIEN_F, AGENT_B, ALIEN_F]);
        let captured = captured_aliens(&actors(&r, Item::Agent), &actors(&r, Item::Alien));
        assert_eq!(captured.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_no_agent_means_no_capture() {
        let stats = RoadStats::analyze(&road(&[ALIEN_F, BURGER, ALIEN_B]));
        assert_eq!(stats.aliens_caught, 0);
        assert_eq!(stats.max_aliens_running_towards_agent, 0);
    }

    #[test]
    fn test_hamburgers_stop_at_blocking_alien() {
        let stats = RoadStats::analyze(&road(&[ALIEN_F, BURGER, ALIEN_F, BURGER, BURGER]));
        // First alien sees one burger before the second alien blocks it; the second sees two
        assert_eq!(stats.max_hamburgers_in_front_of_alien, 2);

        let stats = RoadStats::analyze(&road(&[ALIEN_F, BURGER, ALIEN_B, BURGER]));
        // An alien running the other way does not block
        assert_eq!(stats.max_hamburgers_in_front_of_alien, 2);
    }

    #[test]
    fn test_captured_alien_does_not_block() {
        // Agent catches the alien at 2; the free alien at 0 sees past it
        let r = road(&[ALIEN_F, AGENT_F, ALIEN_F, BURGER, BURGER]);
        let stats = RoadStats::analyze(&r);
        assert_eq!(stats.aliens_caught, 1);
        assert_eq!(stats.max_hamburgers_in_front_of_alien, 2);
    }

    #[test]
    fn test_aliens_running_towards_agent() {
        let r = road(&[ALIEN_F, ALIEN_F, AGENT_B, ALIEN_B, ALIEN_F]);
        let stats = RoadStats::analyze(&r);
        // Two run right towards the agent, one runs left towards it
        assert_eq!(stats.max_aliens_running_towards_agent, 2);
    }

    #[test]
    fn test_aliens_between_facing_agents() {
        let r = road(&[AGENT_F, ALIEN_F, BURGER, ALIEN_B, AGENT_B, ALIEN_F, AGENT_B]);
        let stats = RoadStats::analyze(&r);
        assert_eq!(stats.max_aliens_between_two_agents, 3);

        // Agents facing away from each other trap nothing
        let r = road(&[AGENT_B, ALIEN_F, AGENT_F]);
        assert_eq!(RoadStats::analyze(&r).max_aliens_between_two_agents, 0);
    }

    #[test]
    fn test_food_chain_two_forward_sets() {
        let r = road(&[AGENT_F, ALIEN_F, BURGER, AGENT_F, ALIEN_F, BURGER]);
        assert_eq!(RoadStats::analyze(&r).food_chain_sets, 2);
    }

    #[test]
    fn test_food_chain_skips_bare_cells_and_restarts() {
        let r = road(&[AGENT_F, BARE, AGENT_B, ALIEN_F, BARE, BURGER]);
        assert_eq!(RoadStats::analyze(&r).food_chain_sets, 1);

        let r = road(&[AGENT_F, BURGER, ALIEN_F, BURGER]);
        assert_eq!(RoadStats::analyze(&r).food_chain_sets, 0);
    }

    #[test]
    fn test_food_chain_reverse_pass() {
        let r = road(&[BURGER, ALIEN_B, AGENT_B]);
        assert_eq!(RoadStats::analyze(&r).food_chain_sets, 1);

        // Forward set consumes the first three; the rest reads backwards
        let r = road(&[AGENT_F, ALIEN_F, BURGER, BURGER, ALIEN_B, AGENT_B]);
        assert_eq!(RoadStats::analyze(&r).food_chain_sets, 2);
    }

    #[test]
    fn test_network_aggregation() {
        let roads = vec![
            road(&[AGENT_F, ALIEN_F, BURGER]),
            road(&[ALIEN_F, BURGER, BURGER]),
            road(&[BARE]),
            road(&[AGENT_F, ALIEN_B, ALIEN_F, AGENT_B, BARE]),
        ];
        let agg = analyze_road_network(&roads);
        assert_eq!(
            agg,
            NetworkStats {
                total_roads: 4,
                aliens_caught: 3,
                max_aliens_running_towards_agent: 1,
                max_hamburgers_in_front_of_alien: 2,
                max_agents_on_one_road: 2,
                max_aliens_on_one_road: 2,
                max_aliens_between_two_agents: 2,
                total_food_chain_sets: 1,
                longest_road_size: 5,
                max_roads_of_same_length: 2,
            }
        );
    }

    #[test]
    fn test_empty_network() {
        assert_eq!(analyze_road_network(&[]), NetworkStats::default());
    }
}
