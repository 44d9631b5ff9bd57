use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("history capacity must be at least 1")]
    ZeroCapacity,
}
