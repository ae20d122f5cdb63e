use thiserror::Error;

/// Errors from conversation history storage.
///
/// Load failures never surface as errors (the store degrades to an empty
/// history); these are raised when writing the history back.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode history: {0}")]
    Encode(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Storage(err.to_string())
    }
}
