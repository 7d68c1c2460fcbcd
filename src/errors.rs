use thiserror::Error;

use crate::api::ApiError;

/// Error type for failures outside a single remote operation: loading
/// configuration and building the API client.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}
