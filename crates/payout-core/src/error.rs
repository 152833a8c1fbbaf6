use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PayoutError {
    fn from(e: serde_json::Error) -> Self {
        PayoutError::SerializationError(e.to_string())
    }
}
