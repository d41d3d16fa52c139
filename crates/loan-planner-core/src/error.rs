use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanPlannerError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Index out of range: {index} (collection holds {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl From<serde_json::Error> for LoanPlannerError {
    fn from(e: serde_json::Error) -> Self {
        LoanPlannerError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for LoanPlannerError {
    fn from(e: std::io::Error) -> Self {
        LoanPlannerError::StorageError(e.to_string())
    }
}
