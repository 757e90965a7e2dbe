pub mod cozy;
pub mod san;

use cozy_chess::{Piece, Square};
use serde::{Deserialize, Serialize};

pub use cozy::Position;

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A candidate move as supplied by the user or the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveInput {
    /// Origin/destination squares; castling is given as the two-square king move.
    Squares { from: Square, to: Square, promotion: Option<Piece> },
    /// Standard algebraic notation, resolved against the current position.
    San(String),
}

impl MoveInput {
    /// Reads `e2e4` / `e7e8q` style coordinates, falling back to SAN for anything else.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.len() == 4 || text.len() == 5 {
            let from = text.get(0..2).and_then(|s| s.parse::<Square>().ok());
            let to = text.get(2..4).and_then(|s| s.parse::<Square>().ok());
            if let (Some(from), Some(to)) = (from, to) {
                let promotion = match text.get(4..5) {
                    None | Some("") => Some(None),
                    Some(p) => piece_from_char(p.chars().next().unwrap_or(' ')).map(Some),
                };
                if let Some(promotion) = promotion {
                    return MoveInput::Squares { from, to, promotion };
                }
            }
        }
        MoveInput::San(text.to_string())
    }
}

impl From<&str> for MoveInput {
    fn from(text: &str) -> Self { MoveInput::parse(text) }
}

/// A move that the rules collaborator accepted, with the position it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<char>,
    pub san: String,
    pub fen: String,
}

impl MoveRecord {
    /// Same origin, destination and promotion piece.
    pub fn same_move(&self, other: &MoveRecord) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }

    /// Coordinate notation as used by the evaluation service (`e7e8q`).
    pub fn uci(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(p) = self.promotion { s.push(p); }
        s
    }
}

pub(crate) fn piece_from_char(c: char) -> Option<Piece> {
    match c.to_ascii_lowercase() {
        'p' => Some(Piece::Pawn),
        'n' => Some(Piece::Knight),
        'b' => Some(Piece::Bishop),
        'r' => Some(Piece::Rook),
        'q' => Some(Piece::Queen),
        'k' => Some(Piece::King),
        _ => None,
    }
}

pub(crate) fn piece_char(p: Piece) -> char {
    match p {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}
