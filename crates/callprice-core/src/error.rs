use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown money context: {0:?}")]
    UnknownContext(String),

    #[error("invalid money amount: {0}")]
    InvalidAmount(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}
