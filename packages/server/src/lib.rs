//! # Campus Server
//!
//! HTTP surface over the content store: records, registry, media library
//! and geocoding.

pub mod api;
pub mod config;
pub mod geocode;

pub use api::{router, serve, ApiError, ApiState};
pub use config::{Config, ConfigError, GeocoderConfig, DEFAULT_CONFIG_NAME};
pub use geocode::{AddressQuery, GeocodeError, GeocodeResult, Geocoder};
