use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to read the farm snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("An error occurred during JSON deserialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The data source is unavailable: {0}")]
    Unavailable(String),
}
