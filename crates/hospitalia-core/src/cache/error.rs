use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Network unreachable: {0}")]
    Unreachable(String),

    #[error("Unexpected status {status} for {path}")]
    BadStatus { path: String, status: u16 },

    #[error("Invalid cache store name: {0:?}")]
    InvalidStoreName(String),

    #[error("Cache storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt cache entry: {0}")]
    Entry(#[from] serde_json::Error),
}
