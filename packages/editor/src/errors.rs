//! Error types for the live-edit engine

use campus_content::ContentError;
use campus_dom::DomError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Sign in to edit this page")]
    AuthenticationRequired,

    #[error("Unknown content item: {0}")]
    UnknownItem(String),

    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
