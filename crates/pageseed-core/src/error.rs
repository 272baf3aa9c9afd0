use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageseedError {
    #[error("Invalid configuration for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Insert into {table} rejected with status {status}: {body}")]
    InsertRejected {
        table: String,
        status: u16,
        body: String,
    },

    #[error("ClickHouse at {endpoint} is not ready (status {status})")]
    NotReady { endpoint: String, status: u16 },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, PageseedError>;
