//! API request handlers.

pub mod content;
pub mod geocode;
pub mod media;
pub mod registry;
pub mod status;
