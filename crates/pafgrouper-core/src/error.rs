use thiserror::Error;

use crate::types::PeakId;

#[derive(Error, Debug)]
pub enum PafGroupError {
    #[error("config error: {0}")]
    Config(String),

    #[error("shape error: {0}")]
    Shape(String),

    #[error("zero-length edge between {src:?} and {dst:?}")]
    ZeroLengthEdge { src: PeakId, dst: PeakId },

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PafGroupError>;
