use thiserror::Error;

#[derive(Debug, Error)]
pub enum MortgageSimError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for MortgageSimError {
    fn from(e: serde_json::Error) -> Self {
        MortgageSimError::SerializationError(e.to_string())
    }
}
