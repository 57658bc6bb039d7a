use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourtScanError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Provider errors
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(String),

    #[error("Provider response parsing failed: {0}")]
    ProviderParse(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type CourtResult<T> = Result<T, CourtScanError>;
