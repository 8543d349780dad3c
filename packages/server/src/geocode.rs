//! Address lookup against a Nominatim-compatible `/search` endpoint.
//!
//! One request per lookup, best match only, no retries.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("Address is empty")]
    EmptyAddress,

    #[error("Geocoding service returned status {status}")]
    Status { status: u16 },

    #[error("No location found for \"{0}\"")]
    NotFound(String),

    #[error("Unexpected geocoding response: {0}")]
    InvalidResponse(String),

    #[error("Geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Free-text address parts; blank parts are skipped
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddressQuery {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl AddressQuery {
    /// Comma-joined search text
    pub fn to_search_text(&self) -> String {
        [&self.street, &self.city, &self.postcode, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn geocode(&self, address: &AddressQuery) -> Result<GeocodeResult> {
        let text = address.to_search_text();
        if text.is_empty() {
            return Err(GeocodeError::EmptyAddress);
        }

        tracing::debug!(query = %text, "geocoding address");
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", text.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "geocoding service error");
            return Err(GeocodeError::Status {
                status: status.as_u16(),
            });
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;
        best_match(&text, places)
    }
}

fn best_match(query: &str, places: Vec<Place>) -> Result<GeocodeResult> {
    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NotFound(query.to_string()))?;

    let coordinate = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidResponse(format!("bad coordinate {:?}", value)))
    };

    Ok(GeocodeResult {
        lat: coordinate(&place.lat)?,
        lon: coordinate(&place.lon)?,
        label: place.display_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
    use std::collections::HashMap;

    fn place(lat: &str, lon: &str) -> Place {
        Place {
            lat: lat.to_string(),
            lon: lon.to_string(),
            display_name: "Northfield School, Main Street".to_string(),
        }
    }

    #[test]
    fn test_search_text_skips_blank_parts() {
        let address = AddressQuery {
            street: Some("1 Main Street".to_string()),
            city: Some("  ".to_string()),
            postcode: None,
            country: Some("UK".to_string()),
        };
        assert_eq!(address.to_search_text(), "1 Main Street, UK");
        assert_eq!(AddressQuery::default().to_search_text(), "");
    }

    #[test]
    fn test_best_match() {
        let result = best_match("q", vec![place("51.5", "-0.12"), place("0", "0")]).unwrap();
        assert_eq!(result.lat, 51.5);
        assert_eq!(result.lon, -0.12);
        assert_eq!(result.label, "Northfield School, Main Street");

        assert!(matches!(best_match("q", vec![]), Err(GeocodeError::NotFound(_))));
        assert!(matches!(
            best_match("q", vec![place("north", "0")]),
            Err(GeocodeError::InvalidResponse(_))
        ));
    }

    async fn mock_service(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_geocode_against_local_service() {
        let router = Router::new().route(
            "/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("format").map(String::as_str), Some("json"));
                assert_eq!(params.get("limit").map(String::as_str), Some("1"));
                Json(serde_json::json!([
                    { "lat": "51.75", "lon": "-1.25", "display_name": params["q"].clone() }
                ]))
            }),
        );
        let geocoder = Geocoder::new(mock_service(router).await, "campus-test").unwrap();

        let address = AddressQuery {
            city: Some("Oxford".to_string()),
            ..Default::default()
        };
        let result = geocoder.geocode(&address).await.unwrap();
        assert_eq!(result, GeocodeResult { lat: 51.75, lon: -1.25, label: "Oxford".to_string() });
    }

    #[tokio::test]
    async fn test_geocode_status_error() {
        let router = Router::new().route("/search", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let geocoder = Geocoder::new(mock_service(router).await, "campus-test").unwrap();

        let address = AddressQuery {
            city: Some("Oxford".to_string()),
            ..Default::default()
        };
        let err = geocoder.geocode(&address).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Status { status: 503 }));
    }
}
