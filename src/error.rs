use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("unknown session {0}")]
    UnknownSession(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("evaluation service returned HTTP {0}")]
    HttpStatus(u16),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ReviewError>;
