use thiserror::Error;

/// Custom error type for activity-related operations
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Unsupported activity type: {0}")]
    UnsupportedType(String),
}
