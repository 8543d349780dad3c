//! Error types for content storage

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("Content id must not be empty")]
    EmptyId,

    #[error("Malformed slider content for {id}: {reason}")]
    MalformedSlider { id: String, reason: String },

    #[error("Slider index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid store URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("Store returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;
