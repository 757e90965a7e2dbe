use crate::cache::EvalCache;
use crate::eval::Score;
use crate::tree::MoveTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Annotation {
    Perfect,
    Good,
    Interesting,
    Dubious,
    Mistake,
    Blunder,
}

impl Annotation {
    /// `diff` is the change in evaluation, in pawns, from the mover's point of view.
    pub fn classify(diff: f64) -> Self {
        if diff >= 1.0 { Annotation::Perfect }
        else if diff >= 0.3 { Annotation::Good }
        else if diff >= -0.5 { Annotation::Interesting }
        else if diff >= -1.0 { Annotation::Dubious }
        else if diff >= -2.0 { Annotation::Mistake }
        else { Annotation::Blunder }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Annotation::Perfect => "!!",
            Annotation::Good => "!",
            Annotation::Interesting => "!?",
            Annotation::Dubious => "?!",
            Annotation::Mistake => "?",
            Annotation::Blunder => "??",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Annotation::Perfect => "Perfect",
            Annotation::Good => "Good",
            Annotation::Interesting => "Interesting",
            Annotation::Dubious => "Dubious",
            Annotation::Mistake => "Mistake",
            Annotation::Blunder => "Blunder",
        }
    }
}

/// Grades the move that produced node `index` from the cached evaluations on either
/// side of it. Mate scores and missing evaluations give no annotation.
pub fn annotate_move(cache: &EvalCache, tree: &MoveTree, index: usize) -> Option<Annotation> {
    if index == 0 { return None; }
    let before = cache.lookup(&tree.node(index - 1)?.fen)?.score.centipawns()?;
    let after = cache.lookup(&tree.node(index)?.fen)?.score.centipawns()?;
    let white_moved = tree.node(index - 1)?.fen.split_whitespace().nth(1) == Some("w");
    let diff = if white_moved { after - before } else { before - after };
    Some(Annotation::classify(diff as f64 / 100.0))
}

/// Eval-bar fill for White, in percent.
pub fn win_chance(score: Score) -> f64 {
    match score {
        Score::Mate(m) if m > 0 => 100.0,
        Score::Mate(_) => 0.0,
        Score::Centipawns(cp) => 50.0 + 50.0 * (2.0 / (1.0 + (-0.00368208 * cp as f64).exp()) - 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(Annotation::classify(1.0), Annotation::Perfect);
        assert_eq!(Annotation::classify(0.3), Annotation::Good);
        assert_eq!(Annotation::classify(0.0), Annotation::Interesting);
        assert_eq!(Annotation::classify(-0.8), Annotation::Dubious);
        assert_eq!(Annotation::classify(-1.5), Annotation::Mistake);
        assert_eq!(Annotation::classify(-2.5).symbol(), "??");
    }

    #[test]
    fn win_chance_is_centered() {
        assert!((win_chance(Score::Centipawns(0)) - 50.0).abs() < 1e-9);
        assert!(win_chance(Score::Centipawns(300)) > 75.0);
        assert_eq!(win_chance(Score::Mate(-1)), 0.0);
    }
}
