//! Objective cards, percentile scoring and precomputed optimal boards.
//!
//! A card names one statistic and whether it should be maximised or minimised. Scores
//! come from a percentile table built offline over every valid board: a `max` card
//! scores the percentile of the board's value, a `min` card its complement.
//!
//! Data files:
//! - cards: `[{ "number", "name", "description", "key", "type": "max" | "min" | "" }]`
//! - percentiles: `{ "<stat key>": { "<value>": <percentile> } }`
//! - optimal boards: `{ "<selection key>": { "p00": [piece, side, orientation], ... } }`

use crate::board::{Board, Placement};
use crate::geometry::Position;
use crate::stats::{BoardStats, StatKey, UnknownStatKey};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Card numbers as printed on the cards
pub type CardId = u32;

/// At most this many cards can be in play at once
pub const MAX_SELECTED_CARDS: usize = 3;

#[derive(Debug, Error)]
pub enum ObjectiveError {
    #[error("Malformed objective data: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownStatKey(#[from] UnknownStatKey),

    #[error("At most {MAX_SELECTED_CARDS} cards can be selected, got {count}")]
    TooManyCards { count: usize },

    #[error("Optimal board {selection} has no valid entry for cell {cell}")]
    MalformedLayout { selection: String, cell: String },
}

/// What a card asks of its statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Goal {
    #[serde(rename = "max")]
    Max,
    #[serde(rename = "min")]
    Min,
    /// Card does not depend on the board
    #[default]
    #[serde(rename = "")]
    Unscored,
}

/// Card as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CardRecord {
    number: CardId,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    key: String,
    #[serde(rename = "type", default)]
    goal: Goal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct ObjectiveCard {
    pub number: CardId,
    pub name: String,
    pub description: String,
    pub key: Option<StatKey>,
    pub goal: Goal,
}

impl ObjectiveCard {
    /// Whether the card's score depends on the board at all
    pub fn is_scored(&self) -> bool {
        self.key.is_some() && self.goal != Goal::Unscored
    }
}

impl TryFrom<CardRecord> for ObjectiveCard {
    type Error = UnknownStatKey;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        let key = if record.key.is_empty() {
            None
        } else {
            Some(record.key.parse()?)
        };
        Ok(Self {
            number: record.number,
            name: record.name,
            description: record.description,
            key,
            goal: record.goal,
        })
    }
}

impl From<ObjectiveCard> for CardRecord {
    fn from(card: ObjectiveCard) -> Self {
        Self {
            number: card.number,
            name: card.name,
            description: card.description,
            key: card.key.map(|k| k.as_str().to_string()).unwrap_or_default(),
            goal: card.goal,
        }
    }
}

/// The full card list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardDeck {
    cards: Vec<ObjectiveCard>,
}

impl CardDeck {
    pub fn new(cards: Vec<ObjectiveCard>) -> Self {
        Self { cards }
    }

    pub fn from_json(json: &str) -> Result<Self, ObjectiveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, number: CardId) -> Option<&ObjectiveCard> {
        self.cards.iter().find(|c| c.number == number)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectiveCard> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Percentile rank of every observed value of every statistic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentileTable {
    ranks: HashMap<StatKey, BTreeMap<u32, f64>>,
}

impl PercentileTable {
    pub fn from_json(json: &str) -> Result<Self, ObjectiveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, key: StatKey, value: u32, percentile: f64) {
        self.ranks.entry(key).or_default().insert(value, percentile);
    }

    pub fn percentile(&self, key: StatKey, value: u32) -> Option<f64> {
        self.ranks.get(&key)?.get(&value).copied()
    }
}

/// Score of one card for one board, in 0..=100.
///
/// Unscored cards always give 100. `None` means the value never occurred in the table.
pub fn card_score(card: &ObjectiveCard, stats: &BoardStats, table: &PercentileTable) -> Option<f64> {
    let key = match (card.key, card.goal) {
        (Some(key), Goal::Max | Goal::Min) => key,
        _ => return Some(100.0),
    };
    let p = table.percentile(key, stats.get(key))?;
    match card.goal {
        Goal::Min => Some(100.0 - p),
        _ => Some(p),
    }
}

/// Score of a selected card, as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardScore {
    pub card: CardId,
    pub score: Option<f64>,
}

/// Scores for every selected card found in the deck, in ascending card order
pub fn selection_scores(
    selection: &CardSelection,
    deck: &CardDeck,
    stats: &BoardStats,
    table: &PercentileTable,
) -> Vec<CardScore> {
    selection
        .iter()
        .filter_map(|number| deck.get(number))
        .map(|card| CardScore {
            card: card.number,
            score: card_score(card, stats, table),
        })
        .collect()
}

/// Cards currently in play
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardId>", into = "Vec<CardId>")]
pub struct CardSelection {
    cards: BTreeSet<CardId>,
}

impl CardSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the card if selected, otherwise add it when there is room.
    /// Returns whether the card is selected afterwards.
    pub fn toggle(&mut self, card: CardId) -> bool {
        if self.cards.remove(&card) {
            return false;
        }
        if self.cards.len() < MAX_SELECTED_CARDS {
            self.cards.insert(card);
            return true;
        }
        false
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Ascending card numbers joined by `_`, e.g. `1_5_12`
    pub fn selection_key(&self) -> String {
        self.cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl TryFrom<Vec<CardId>> for CardSelection {
    type Error = ObjectiveError;

    fn try_from(cards: Vec<CardId>) -> Result<Self, Self::Error> {
        let cards: BTreeSet<CardId> = cards.into_iter().collect();
        if cards.len() > MAX_SELECTED_CARDS {
            return Err(ObjectiveError::TooManyCards { count: cards.len() });
        }
        Ok(Self { cards })
    }
}

impl From<CardSelection> for Vec<CardId> {
    fn from(selection: CardSelection) -> Self {
        selection.cards.into_iter().collect()
    }
}

/// Cell key used by the optimal-board files, e.g. `p12` for row 1, column 2
fn cell_key(pos: Position) -> String {
    format!("p{}{}", pos.row(), pos.col())
}

/// Best known board for each card combination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptimalBoards {
    boards: HashMap<String, Board>,
}

impl OptimalBoards {
    pub fn from_json(json: &str) -> Result<Self, ObjectiveError> {
        let raw: HashMap<String, HashMap<String, serde_json::Value>> = serde_json::from_str(json)?;
        let mut boards = HashMap::with_capacity(raw.len());

        for (selection, layout) in raw {
            let mut board = Board::new();
            for pos in Position::all() {
                let cell = cell_key(pos);
                let placement = layout
                    .get(&cell)
                    .and_then(|v| Placement::deserialize(v).ok())
                    .ok_or_else(|| ObjectiveError::MalformedLayout {
                        selection: selection.clone(),
                        cell: cell.clone(),
                    })?;
                board.set(pos, Some(placement));
            }
            boards.insert(selection, board);
        }
        Ok(Self { boards })
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn lookup(&self, selection: &CardSelection) -> Option<Board> {
        if selection.is_empty() {
            return None;
        }
        self.boards.get(&selection.selection_key()).copied()
    }
}

/// Every stat entry, the selected cards' keys first; each group sorted by key name.
pub fn ranked_stats(
    stats: &BoardStats,
    selection: &CardSelection,
    deck: &CardDeck,
) -> Vec<(StatKey, u32)> {
    let highlighted: BTreeSet<StatKey> = selection
        .iter()
        .filter_map(|n| deck.get(n))
        .filter_map(|c| c.key)
        .collect();

    let mut entries = stats.entries();
    entries.sort_by(|(a, _), (b, _)| {
        let group = |k: &StatKey| !highlighted.contains(k);
        group(a)
            .cmp(&group(b))
            .then_with(|| a.as_str().cmp(b.as_str()))
    });
    entries
}
