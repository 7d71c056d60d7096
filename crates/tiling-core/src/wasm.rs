//! WebAssembly bindings for the board analyzer.
//!
//! Boards, selections and results cross the boundary as JSON strings.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::board::Board;
#[cfg(feature = "wasm")]
use crate::objectives::{
    ranked_stats, selection_scores, CardDeck, CardSelection, OptimalBoards, PercentileTable,
};
#[cfg(feature = "wasm")]
use crate::solver::random_valid_board;
#[cfg(feature = "wasm")]
use crate::stats::evaluate;
#[cfg(feature = "wasm")]
use crate::tile::TileCatalog;
#[cfg(feature = "wasm")]
use crate::validate::validation;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(feature = "wasm")]
fn parse_board(board_json: &str) -> Result<Board, JsValue> {
    serde_json::from_str(board_json).map_err(|e| JsValue::from_str(&format!("Invalid board JSON: {}", e)))
}

#[cfg(feature = "wasm")]
fn parse_selection(selection_json: &str) -> Result<CardSelection, JsValue> {
    serde_json::from_str(selection_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid card selection: {}", e)))
}

/// WASM-exposed analyzer holding the loaded game data
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmAnalyzer {
    catalog: TileCatalog,
    cards: CardDeck,
    percentiles: Option<PercentileTable>,
    optimal: Option<OptimalBoards>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmAnalyzer {
    /// Load the tile catalog and, optionally, cards, percentiles and optimal boards
    #[wasm_bindgen(constructor)]
    pub fn new(
        tiles_json: &str,
        cards_json: Option<String>,
        percentiles_json: Option<String>,
        solutions_json: Option<String>,
    ) -> Result<WasmAnalyzer, JsValue> {
        let catalog = TileCatalog::from_json(tiles_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid tiles: {}", e)))?;
        let cards = match cards_json {
            Some(json) => CardDeck::from_json(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid cards: {}", e)))?,
            None => CardDeck::default(),
        };
        let percentiles = percentiles_json
            .map(|json| PercentileTable::from_json(&json))
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("Invalid percentiles: {}", e)))?;
        let optimal = solutions_json
            .map(|json| OptimalBoards::from_json(&json))
            .transpose()
            .map_err(|e| JsValue::from_str(&format!("Invalid solutions: {}", e)))?;

        Ok(WasmAnalyzer {
            catalog,
            cards,
            percentiles,
            optimal,
        })
    }

    /// Number of pieces in the catalog
    #[wasm_bindgen(js_name = pieceCount)]
    pub fn piece_count(&self) -> usize {
        self.catalog.len()
    }

    /// Edge and loop check, as `{ valid, error }`
    pub fn validate(&self, board_json: &str) -> Result<String, JsValue> {
        let board = parse_board(board_json)?;
        Ok(serde_json::to_string(&validation(&board, &self.catalog)).unwrap_or_else(|_| "{}".to_string()))
    }

    /// Full evaluation: incomplete, invalid with a message, or valid with stats
    pub fn analyze(&self, board_json: &str) -> Result<String, JsValue> {
        let board = parse_board(board_json)?;
        Ok(serde_json::to_string(&evaluate(&board, &self.catalog)).unwrap_or_else(|_| "{}".to_string()))
    }

    /// Best known board for the selected cards, or `null`
    #[wasm_bindgen(js_name = optimalBoard)]
    pub fn optimal_board(&self, selection_json: &str) -> Result<String, JsValue> {
        let selection = parse_selection(selection_json)?;
        let board = self.optimal.as_ref().and_then(|o| o.lookup(&selection));
        Ok(serde_json::to_string(&board).unwrap_or_else(|_| "null".to_string()))
    }

    /// Scores of the selected cards; empty unless the board is valid
    #[wasm_bindgen(js_name = cardScores)]
    pub fn card_scores(&self, board_json: &str, selection_json: &str) -> Result<String, JsValue> {
        let board = parse_board(board_json)?;
        let selection = parse_selection(selection_json)?;
        let evaluation = evaluate(&board, &self.catalog);

        let scores = match (evaluation.stats(), &self.percentiles) {
            (Some(stats), Some(table)) => selection_scores(&selection, &self.cards, stats, table),
            _ => Vec::new(),
        };
        Ok(serde_json::to_string(&scores).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Stat entries with the selected cards' keys first; empty unless the board is valid
    #[wasm_bindgen(js_name = rankedStats)]
    pub fn ranked_stats(&self, board_json: &str, selection_json: &str) -> Result<String, JsValue> {
        let board = parse_board(board_json)?;
        let selection = parse_selection(selection_json)?;
        let entries = evaluate(&board, &self.catalog)
            .stats()
            .map(|stats| ranked_stats(stats, &selection, &self.cards))
            .unwrap_or_default();
        Ok(serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string()))
    }

    /// A random valid completion of the board, or `null`
    #[wasm_bindgen(js_name = randomBoard)]
    pub fn random_board(&self, board_json: &str) -> Result<String, JsValue> {
        let partial = parse_board(board_json)?;
        let board = random_valid_board(&partial, &self.catalog);
        Ok(serde_json::to_string(&board).unwrap_or_else(|_| "null".to_string()))
    }
}
