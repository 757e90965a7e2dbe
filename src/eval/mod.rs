//! Evaluation results as attached to tree nodes and stored in the cache.

pub mod client;

use serde::{Deserialize, Serialize};

/// Mate score used for a position that is already checkmate.
pub const CHECKMATE_SCORE: i32 = 100;

/// Engine evaluation score, from White's point of view.
///
/// Mate: positive N = White mates in N, negative N = Black mates in N.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Score {
    Centipawns(i32),
    Mate(i32),
}

impl Score {
    pub fn is_mate(&self) -> bool { matches!(self, Score::Mate(_)) }

    pub fn centipawns(&self) -> Option<i32> {
        match self {
            Score::Centipawns(cp) => Some(*cp),
            Score::Mate(_) => None,
        }
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Centipawns(cp) => write!(f, "{:+.2}", *cp as f64 / 100.0),
            Score::Mate(m) if *m >= 0 => write!(f, "+M{}", m),
            Score::Mate(m) => write!(f, "-M{}", m.abs()),
        }
    }
}

/// One ranked alternative line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub score: Score,
    pub pv: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalResult {
    pub score: Score,
    pub depth: u32,
    pub best_move: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub continuation: Vec<String>,
    #[serde(default)]
    pub variants: Vec<Line>,
}

impl EvalResult {
    /// Fixed result for a checkmated side to move; `white_won` when Black is mated.
    pub fn checkmate(white_won: bool) -> Self {
        EvalResult {
            score: Score::Mate(if white_won { CHECKMATE_SCORE } else { -CHECKMATE_SCORE }),
            depth: 0,
            best_move: None,
            text: Some("Checkmate".to_string()),
            continuation: Vec::new(),
            variants: Vec::new(),
        }
    }
}

/// Response body of the evaluation service.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEval {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub eval: Option<f64>,
    #[serde(default)]
    pub mate: Option<i32>,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(rename = "move", default)]
    pub best_move: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub continuation_arr: Vec<String>,
    #[serde(default)]
    pub variants: Vec<RawEval>,
}

impl RawEval {
    pub fn is_usage_limit(&self) -> bool {
        self.kind.as_deref() == Some("error") && self.error.as_deref() == Some("HIGH_USAGE")
    }

    pub fn score(&self) -> Score {
        match self.mate {
            Some(m) => Score::Mate(m),
            None => Score::Centipawns((self.eval.unwrap_or(0.0) * 100.0).round() as i32),
        }
    }

    /// Shapes a response into an [`EvalResult`]; responses without a best move carry no result.
    pub fn format(&self) -> Option<EvalResult> {
        let best = self.best_move.clone()?;
        Some(EvalResult {
            score: self.score(),
            depth: self.depth.unwrap_or(0),
            best_move: Some(best),
            text: self.text.clone(),
            continuation: self.continuation_arr.clone(),
            variants: self.variants.iter()
                .map(|v| Line { score: v.score(), pv: v.continuation_arr.clone() })
                .collect(),
        })
    }
}
