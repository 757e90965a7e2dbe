use cozy_chess::{Board, Move, Piece};

fn piece_letter(p: Piece) -> char {
    match p {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

/// Drops check/mate/annotation suffixes and the `0-0` spelling so labels compare equal.
pub fn strip_suffix(san: &str) -> String {
    san.trim()
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
        .replace('0', "O")
}

/// Standard algebraic notation for a legal move on `board`.
pub fn to_san(board: &Board, mv: Move) -> String {
    let stm = board.side_to_move();
    let piece = match board.piece_on(mv.from) {
        Some(p) => p,
        None => return format!("{}", mv),
    };
    let mut san = String::new();
    if piece == Piece::King && board.color_on(mv.to) == Some(stm) {
        san.push_str(if (mv.to.file() as u8) > (mv.from.file() as u8) { "O-O" } else { "O-O-O" });
    } else {
        let from = mv.from.to_string();
        let capture = board.color_on(mv.to) == Some(!stm)
            || (piece == Piece::Pawn && mv.from.file() != mv.to.file());
        if piece == Piece::Pawn {
            if capture { san.push_str(&from[0..1]); }
        } else {
            san.push(piece_letter(piece));
            let mut rivals = Vec::new();
            board.generate_moves(|ml| {
                if ml.piece == piece && ml.from != mv.from && ml.to.has(mv.to) { rivals.push(ml.from); }
                false
            });
            if !rivals.is_empty() {
                let file_clash = rivals.iter().any(|sq| sq.file() == mv.from.file());
                let rank_clash = rivals.iter().any(|sq| sq.rank() == mv.from.rank());
                if !file_clash { san.push_str(&from[0..1]); }
                else if !rank_clash { san.push_str(&from[1..2]); }
                else { san.push_str(&from); }
            }
        }
        if capture { san.push('x'); }
        san.push_str(&mv.to.to_string());
        if let Some(p) = mv.promotion {
            san.push('=');
            san.push(piece_letter(p));
        }
    }
    let mut after = board.clone();
    after.play(mv);
    if !after.checkers().is_empty() {
        let escapes = after.generate_moves(|ml| !ml.is_empty());
        san.push(if escapes { '+' } else { '#' });
    }
    san
}
