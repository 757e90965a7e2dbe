use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading FEN fields that identify a position for evaluation purposes:
/// placement, side to move, castling rights, en-passant target.
const IDENTITY_FIELDS: usize = 4;

/// Cache key: a FEN without its half-move clock and full-move number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionKey(String);

impl PositionKey {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

/// Strips the move counters from a FEN. Total: descriptors with fewer fields
/// are kept as they are, with whitespace collapsed.
pub fn normalize(fen: &str) -> PositionKey {
    let fields: Vec<&str> = fen.split_whitespace().take(IDENTITY_FIELDS).collect();
    PositionKey(fields.join(" "))
}
