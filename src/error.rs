use thiserror::Error;

#[derive(Error, Debug)]
pub enum MendError {
    #[error("API request failed: {0}")]
    ApiRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model call timed out after {0}s")]
    ModelTimeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Dialog error: {0}")]
    Dialog(String),
}

impl From<dialoguer::Error> for MendError {
    fn from(err: dialoguer::Error) -> Self {
        MendError::Dialog(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MendError>;
