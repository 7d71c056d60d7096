//! Per-connection board editing session.

use crate::data::GameData;
use crate::protocol::BoardReport;
use thiserror::Error;
use tiling_core::{
    evaluate, selection_scores, Board, CardId, CardSelection, PieceId, Placement, Position,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Cell index {0} is out of range")]
    IndexOutOfRange(usize),

    #[error("Cell {0} is already occupied")]
    CellOccupied(usize),

    #[error("Cell {0} is empty")]
    CellEmpty(usize),

    #[error("Piece {0} does not exist")]
    UnknownPiece(PieceId),

    #[error("Piece {0} is already on the board")]
    PieceAlreadyPlaced(PieceId),

    #[error("Card {0} does not exist")]
    UnknownCard(CardId),

    #[error("No cards selected")]
    NoCardsSelected,

    #[error("Optimal boards are not available")]
    NoOptimalData,

    #[error("No optimal board for cards {0}")]
    NoOptimalBoard(String),
}

/// A board being edited plus the objective cards in play.
#[derive(Debug, Clone, Default)]
pub struct BoardSession {
    pub board: Board,
    pub selection: CardSelection,
}

fn position(index: usize) -> Result<Position, SessionError> {
    Position::new(index).ok_or(SessionError::IndexOutOfRange(index))
}

impl BoardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a piece from the palette, unrotated, into an empty cell
    pub fn place_tile(
        &mut self,
        index: usize,
        piece: PieceId,
        side: u8,
        data: &GameData,
    ) -> Result<(), SessionError> {
        let pos = position(index)?;
        if usize::from(piece) >= data.catalog.len() {
            return Err(SessionError::UnknownPiece(piece));
        }
        if self.board.get(pos).is_some() {
            return Err(SessionError::CellOccupied(index));
        }
        if self.board.contains_piece(piece) {
            return Err(SessionError::PieceAlreadyPlaced(piece));
        }
        self.board.set(pos, Some(Placement::new(piece, side, 0)));
        Ok(())
    }

    pub fn rotate_tile(&mut self, index: usize) -> Result<(), SessionError> {
        if !self.board.rotate(position(index)?) {
            return Err(SessionError::CellEmpty(index));
        }
        Ok(())
    }

    pub fn flip_tile(&mut self, index: usize) -> Result<(), SessionError> {
        if !self.board.flip(position(index)?) {
            return Err(SessionError::CellEmpty(index));
        }
        Ok(())
    }

    /// Exchange two placed tiles
    pub fn swap_tiles(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        let (a, b) = (position(from)?, position(to)?);
        for (index, pos) in [(from, a), (to, b)] {
            if self.board.get(pos).is_none() {
                return Err(SessionError::CellEmpty(index));
            }
        }
        self.board.swap(a, b);
        Ok(())
    }

    /// Move a placed tile into an empty cell
    pub fn move_tile(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        let (a, b) = (position(from)?, position(to)?);
        if self.board.get(a).is_none() {
            return Err(SessionError::CellEmpty(from));
        }
        if !self.board.move_tile(a, b) {
            return Err(SessionError::CellOccupied(to));
        }
        Ok(())
    }

    pub fn remove_tile(&mut self, index: usize) -> Result<(), SessionError> {
        self.board
            .take(position(index)?)
            .map(|_| ())
            .ok_or(SessionError::CellEmpty(index))
    }

    /// Select or deselect a card; selecting a fourth card is silently ignored
    pub fn toggle_card(&mut self, card: CardId, data: &GameData) -> Result<bool, SessionError> {
        if data.cards.get(card).is_none() {
            return Err(SessionError::UnknownCard(card));
        }
        Ok(self.selection.toggle(card))
    }

    /// Replace the board with the best known board for the selected cards
    pub fn load_optimal(&mut self, data: &GameData) -> Result<(), SessionError> {
        if self.selection.is_empty() {
            return Err(SessionError::NoCardsSelected);
        }
        let optimal = data.optimal.as_ref().ok_or(SessionError::NoOptimalData)?;
        self.board = optimal
            .lookup(&self.selection)
            .ok_or_else(|| SessionError::NoOptimalBoard(self.selection.selection_key()))?;
        Ok(())
    }

    /// Clear the board; the card selection stays
    pub fn reset(&mut self) {
        self.board = Board::new();
    }

    pub fn report(&self, data: &GameData) -> BoardReport {
        let evaluation = evaluate(&self.board, &data.catalog);
        let scores = match (evaluation.stats(), &data.percentiles) {
            (Some(stats), Some(table)) => selection_scores(&self.selection, &data.cards, stats, table),
            _ => Vec::new(),
        };
        BoardReport {
            board: self.board,
            selected_cards: self.selection.iter().collect(),
            evaluation,
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiling_core::{
        CardDeck, CardScore, Evaluation, OptimalBoards, PercentileTable, StatKey, TileCatalog,
        TileSide, CELL_COUNT,
    };

    /// Nine pieces, blank on side 0 with a house on side 1, and four cards
    fn data() -> GameData {
        let catalog = TileCatalog::from_pieces(vec![
            [TileSide::default(), TileSide {
                houses: 1,
                ..Default::default()
            }];
            9
        ])
        .unwrap();
        let cards = CardDeck::from_json(
            r#"[
                {"number": 1, "name": "Houses", "key": "total_houses", "type": "max"},
                {"number": 2, "name": "Roads", "key": "total_roads", "type": "min"},
                {"number": 3, "name": "Dogs", "key": "largest_dog_group", "type": "max"},
                {"number": 5, "name": "Aliens", "key": "total_aliens", "type": "min"}
            ]"#,
        )
        .unwrap();
        let mut percentiles = PercentileTable::default();
        percentiles.insert(StatKey::TotalHouses, 0, 10.0);
        GameData {
            catalog,
            cards,
            percentiles: Some(percentiles),
            optimal: None,
        }
    }

    fn full_session(data: &GameData) -> BoardSession {
        let mut session = BoardSession::new();
        for i in 0..CELL_COUNT {
            session.place_tile(i, i as u8, 0, data).unwrap();
        }
        session
    }

    #[test]
    fn test_place_tile_rules() {
        let data = data();
        let mut session = BoardSession::new();

        session.place_tile(4, 2, 1, &data).unwrap();
        assert_eq!(session.board.cells()[4], Some(Placement::new(2, 1, 0)));

        assert_eq!(
            session.place_tile(4, 3, 0, &data),
            Err(SessionError::CellOccupied(4))
        );
        assert_eq!(
            session.place_tile(0, 2, 0, &data),
            Err(SessionError::PieceAlreadyPlaced(2))
        );
        assert_eq!(
            session.place_tile(9, 3, 0, &data),
            Err(SessionError::IndexOutOfRange(9))
        );
        assert_eq!(
            session.place_tile(0, 9, 0, &data),
            Err(SessionError::UnknownPiece(9))
        );
    }

    #[test]
    fn test_rotate_and_flip() {
        let data = data();
        let mut session = BoardSession::new();
        session.place_tile(0, 5, 0, &data).unwrap();

        for _ in 0..5 {
            session.rotate_tile(0).unwrap();
        }
        session.flip_tile(0).unwrap();
        assert_eq!(session.board.cells()[0], Some(Placement::new(5, 1, 1)));

        assert_eq!(session.rotate_tile(1), Err(SessionError::CellEmpty(1)));
        assert_eq!(session.flip_tile(1), Err(SessionError::CellEmpty(1)));
    }

    #[test]
    fn test_swap_move_remove() {
        let data = data();
        let mut session = BoardSession::new();
        session.place_tile(0, 0, 0, &data).unwrap();
        session.place_tile(1, 1, 1, &data).unwrap();

        session.swap_tiles(0, 1).unwrap();
        assert_eq!(session.board.cells()[0], Some(Placement::new(1, 1, 0)));
        assert_eq!(session.swap_tiles(0, 2), Err(SessionError::CellEmpty(2)));

        session.move_tile(0, 8).unwrap();
        assert_eq!(session.board.cells()[0], None);
        assert_eq!(session.board.cells()[8], Some(Placement::new(1, 1, 0)));
        assert_eq!(session.move_tile(8, 1), Err(SessionError::CellOccupied(1)));
        assert_eq!(session.move_tile(3, 4), Err(SessionError::CellEmpty(3)));

        session.remove_tile(8).unwrap();
        assert_eq!(session.remove_tile(8), Err(SessionError::CellEmpty(8)));
        assert_eq!(session.board.empty_cells().len(), 8);
    }

    #[test]
    fn test_card_toggle() {
        let data = data();
        let mut session = BoardSession::new();
        assert_eq!(session.toggle_card(1, &data), Ok(true));
        assert_eq!(session.toggle_card(2, &data), Ok(true));
        assert_eq!(session.toggle_card(3, &data), Ok(true));
        assert_eq!(session.toggle_card(5, &data), Ok(false));
        assert_eq!(session.toggle_card(2, &data), Ok(false));
        assert_eq!(session.toggle_card(4, &data), Err(SessionError::UnknownCard(4)));
        assert_eq!(session.selection.selection_key(), "1_3");
    }

    #[test]
    fn test_load_optimal() {
        let mut data = data();
        let mut session = BoardSession::new();
        assert_eq!(session.load_optimal(&data), Err(SessionError::NoCardsSelected));

        session.toggle_card(3, &data).unwrap();
        session.toggle_card(1, &data).unwrap();
        assert_eq!(session.load_optimal(&data), Err(SessionError::NoOptimalData));

        data.optimal = Some(
            OptimalBoards::from_json(
                r#"{"1_3": {
                    "p00": [8, 0, 0], "p01": [7, 0, 0], "p02": [6, 0, 0],
                    "p10": [5, 0, 0], "p11": [4, 1, 0], "p12": [3, 0, 0],
                    "p20": [2, 0, 0], "p21": [1, 0, 0], "p22": [0, 0, 0]
                }}"#,
            )
            .unwrap(),
        );
        session.load_optimal(&data).unwrap();
        assert_eq!(session.board.cells()[4], Some(Placement::new(4, 1, 0)));

        session.toggle_card(1, &data).unwrap();
        assert_eq!(
            session.load_optimal(&data),
            Err(SessionError::NoOptimalBoard("3".to_string()))
        );
    }

    #[test]
    fn test_report_scores_valid_boards_only() {
        let data = data();
        let mut session = BoardSession::new();
        session.toggle_card(1, &data).unwrap();

        let report = session.report(&data);
        assert!(matches!(report.evaluation, Evaluation::Incomplete { .. }));
        assert!(report.scores.is_empty());
        assert_eq!(report.selected_cards, vec![1]);

        let mut session = full_session(&data);
        session.toggle_card(1, &data).unwrap();
        let report = session.report(&data);
        assert!(matches!(report.evaluation, Evaluation::Valid { .. }));
        assert_eq!(
            report.scores,
            vec![CardScore {
                card: 1,
                score: Some(10.0)
            }]
        );
    }

    #[test]
    fn test_reset_keeps_cards() {
        let data = data();
        let mut session = full_session(&data);
        session.toggle_card(2, &data).unwrap();
        session.reset();
        assert_eq!(session.board, Board::new());
        assert!(session.selection.contains(2));
    }
}
