pub mod annotate;
pub mod outcome;

pub use annotate::{annotate_move, win_chance, Annotation};
pub use outcome::{game_over, GameOutcome};
