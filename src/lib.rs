//! Game-review core: branching move tree, evaluation cache and the analysis
//! scheduler that keeps both filled from a remote engine.
pub mod analysis;
pub mod board;
pub mod cache;
pub mod config;
pub mod error;
pub mod eval;
pub mod repl;
pub mod review;
pub mod session;
pub mod tree;

pub use analysis::Analyzer;
pub use error::{ReviewError, Result};
