use thiserror::Error;

use crate::scoring::ValidationError;

#[derive(Debug, Error)]
pub enum CalculatorError {
    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid input for calculator '{calculator_id}': {source}")]
    InvalidInput {
        calculator_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] pneumo_core::error::CoreError),
}
