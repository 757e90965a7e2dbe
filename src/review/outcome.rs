use cozy_chess::Color;
use std::fmt;

use crate::cache::normalize;
use crate::tree::MoveTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    ThreefoldRepetition,
    InsufficientMaterial,
    FiftyMoveRule,
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GameOutcome::Checkmate { .. } => "Checkmate!",
            GameOutcome::Stalemate => "Draw (Stalemate)",
            GameOutcome::ThreefoldRepetition => "Draw (Threefold Repetition)",
            GameOutcome::InsufficientMaterial => "Draw (Dead Position)",
            GameOutcome::FiftyMoveRule => "Draw (50-move rule)",
        };
        f.write_str(msg)
    }
}

/// Terminal state of the node being viewed. Repetition counts occurrences of the
/// current normalized position along the active line up to the viewed node.
pub fn game_over(tree: &MoveTree) -> Option<GameOutcome> {
    let pos = tree.position().ok()?;
    if pos.is_checkmate() { return Some(GameOutcome::Checkmate { winner: !pos.side_to_move() }); }
    if pos.is_stalemate() { return Some(GameOutcome::Stalemate); }
    let here = normalize(&tree.current().fen);
    let seen = tree.line()[..=tree.index()].iter().filter(|n| normalize(&n.fen) == here).count();
    if seen >= 3 { return Some(GameOutcome::ThreefoldRepetition); }
    if pos.is_insufficient_material() { return Some(GameOutcome::InsufficientMaterial); }
    if pos.is_fifty_move_draw() { return Some(GameOutcome::FiftyMoveRule); }
    None
}
