//! Game data loaded once at startup and shared by every connection.

use crate::config::ServerConfig;
use anyhow::Context;
use std::path::Path;
use tiling_core::{CardDeck, OptimalBoards, PercentileTable, TileCatalog};
use tracing::{info, warn};

/// Read-only data behind every session
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub catalog: TileCatalog,
    pub cards: CardDeck,
    /// Missing when the percentile file could not be loaded; card scores are then omitted
    pub percentiles: Option<PercentileTable>,
    /// Missing when the solutions file could not be loaded
    pub optimal: Option<OptimalBoards>,
}

impl GameData {
    /// Load every data file. The catalog and cards are required.
    pub fn load(config: &ServerConfig) -> anyhow::Result<Self> {
        let catalog = TileCatalog::from_json(&read(&config.tiles_path)?)
            .with_context(|| format!("Invalid tile catalog {}", config.tiles_path.display()))?;
        let cards = CardDeck::from_json(&read(&config.cards_path)?)
            .with_context(|| format!("Invalid cards {}", config.cards_path.display()))?;

        let percentiles = load_optional(&config.percentiles_path, "percentiles", |json| {
            PercentileTable::from_json(json).map_err(anyhow::Error::from)
        });
        let optimal = load_optional(&config.solutions_path, "optimal boards", |json| {
            OptimalBoards::from_json(json).map_err(anyhow::Error::from)
        });

        info!(
            "Loaded {} tiles, {} cards (percentiles: {}, optimal boards: {})",
            catalog.len(),
            cards.len(),
            percentiles.is_some(),
            optimal.as_ref().map_or(0, |o| o.len()),
        );

        Ok(Self {
            catalog,
            cards,
            percentiles,
            optimal,
        })
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Optional files only log a warning when they are missing or malformed
fn load_optional<T, F>(path: &Path, what: &str, parse: F) -> Option<T>
where
    F: FnOnce(&str) -> anyhow::Result<T>,
{
    match read(path).and_then(|json| parse(&json)) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Could not load {} from {}: {:#}", what, path.display(), e);
            None
        }
    }
}
