use cozy_chess::{Board as CozyBoard, Color, File, Move, Piece, Square};

use crate::board::{piece_char, san, MoveInput, MoveRecord};
use crate::error::{Result, ReviewError};

/// Rules collaborator: legality, move application and terminal-state queries.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Default for Position {
    fn default() -> Self { Self::startpos() }
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        CozyBoard::from_fen(fen.trim(), false)
            .map(|b| Self { board: b })
            .map_err(|e| ReviewError::InvalidFen { fen: fen.to_string(), reason: format!("{e:?}") })
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String { format!("{}", self.board) }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|ml| { moves.extend(ml); false });
        moves
    }

    fn has_legal_move(&self) -> bool {
        self.board.generate_moves(|ml| !ml.is_empty())
    }

    pub fn is_check(&self) -> bool { !self.board.checkers().is_empty() }

    pub fn is_checkmate(&self) -> bool { self.is_check() && !self.has_legal_move() }

    pub fn is_stalemate(&self) -> bool { !self.is_check() && !self.has_legal_move() }

    pub fn is_fifty_move_draw(&self) -> bool {
        self.board.halfmove_clock() >= 100 && !self.is_checkmate()
    }

    /// Bare kings, a single minor piece against a bare king, or only bishops
    /// besides the kings, all on squares of one colour.
    pub fn is_insufficient_material(&self) -> bool {
        let occupied = self.board.occupied().len();
        let bishops = self.board.pieces(Piece::Bishop);
        match occupied {
            2 => true,
            3 if !self.board.pieces(Piece::Knight).is_empty() => true,
            _ if !bishops.is_empty() && bishops.len() + 2 == occupied => {
                let mut shades = bishops.into_iter().map(|sq| (sq.file() as u8 + sq.rank() as u8) % 2);
                let first = shades.next();
                shades.all(|shade| Some(shade) == first)
            }
            _ => false,
        }
    }

    /// Castling is generated as king-takes-rook; report it as the two-square king move.
    pub(crate) fn standard_to(&self, mv: Move) -> Square {
        if self.is_castle(mv) {
            let file = if (mv.to.file() as u8) > (mv.from.file() as u8) { File::G } else { File::C };
            Square::new(file, mv.from.rank())
        } else {
            mv.to
        }
    }

    pub(crate) fn is_castle(&self, mv: Move) -> bool {
        self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == Some(self.board.side_to_move())
    }

    /// Finds the legal move the input denotes. An unspecified promotion piece means a queen.
    pub fn resolve(&self, input: &MoveInput) -> Option<Move> {
        let legal = self.legal_moves();
        match input {
            MoveInput::Squares { from, to, promotion } => {
                let candidates: Vec<Move> = legal.into_iter()
                    .filter(|m| m.from == *from && (m.to == *to || self.standard_to(*m) == *to))
                    .collect();
                match promotion {
                    Some(p) => candidates.into_iter().find(|m| m.promotion == Some(*p)),
                    None => candidates.iter().copied().find(|m| m.promotion.is_none())
                        .or_else(|| candidates.into_iter().find(|m| m.promotion == Some(Piece::Queen))),
                }
            }
            MoveInput::San(text) => {
                let wanted = san::strip_suffix(text);
                legal.into_iter().find(|m| san::strip_suffix(&san::to_san(&self.board, *m)) == wanted)
            }
        }
    }

    /// Validates and applies the move; `None` leaves the position untouched.
    pub fn play(&mut self, input: &MoveInput) -> Option<MoveRecord> {
        let mv = self.resolve(input)?;
        let label = san::to_san(&self.board, mv);
        let to = self.standard_to(mv);
        self.board.play(mv);
        Some(MoveRecord {
            from: mv.from.to_string(),
            to: to.to_string(),
            promotion: mv.promotion.map(piece_char),
            san: label,
            fen: self.fen(),
        })
    }
}
