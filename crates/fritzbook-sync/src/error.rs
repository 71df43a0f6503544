use fritzbook_core::{CoreError, ExtractionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "http")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "http")]
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
