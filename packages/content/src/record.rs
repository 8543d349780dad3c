//! # Content Records
//!
//! Persisted shapes for editable content and the media library.
//!
//! A `ContentRecord` is keyed by its content id (a stable string chosen by
//! the page markup), not by the store's internal `record_id`. Updates never
//! replace a record wholesale; they go through `ContentPatch`, which copies
//! only the fields that are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum number of media records returned by a single listing.
pub const MAX_MEDIA_PAGE_SIZE: usize = 50;

/// Shape of an editable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Text,
    Image,
    ImageSlider,
    RichText,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::ImageSlider => "imageSlider",
            ContentType::RichText => "richText",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentType::Text),
            "image" => Ok(ContentType::Image),
            "imageSlider" => Ok(ContentType::ImageSlider),
            "richText" => Ok(ContentType::RichText),
            other => Err(format!("unknown content type: {}", other)),
        }
    }
}

/// Persisted content for one editable id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    /// Store-internal identifier (stable for the life of the record)
    pub record_id: u64,

    /// Content id, unique across the store
    pub id: String,

    pub content: String,

    #[serde(rename = "type")]
    pub content_type: ContentType,

    pub page: String,

    /// Set once on insert, preserved by every patch
    pub created_at: DateTime<Utc>,

    pub last_modified: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Upsert request for a single content id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentWrite {
    pub id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ContentWrite {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        content_type: ContentType,
        page: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            content_type,
            page: page.into(),
            media_id: None,
            alt: None,
        }
    }

    pub fn with_media_id(mut self, media_id: impl Into<String>) -> Self {
        self.media_id = Some(media_id.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// The patch applied when the id already exists
    pub fn to_patch(&self) -> ContentPatch {
        ContentPatch {
            content: Some(self.content.clone()),
            content_type: Some(self.content_type),
            page: Some(self.page.clone()),
            media_id: self.media_id.clone(),
            alt: self.alt.clone(),
        }
    }

    /// Build a fresh record for the insert path
    pub fn into_record(self, record_id: u64, now: DateTime<Utc>) -> ContentRecord {
        ContentRecord {
            record_id,
            id: self.id,
            content: self.content,
            content_type: self.content_type,
            page: self.page,
            created_at: now,
            last_modified: now,
            media_id: self.media_id,
            alt: self.alt,
        }
    }
}

/// Partial update: every `Some` field is copied onto the record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<ContentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl ContentPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.content_type.is_none()
            && self.page.is_none()
            && self.media_id.is_none()
            && self.alt.is_none()
    }

    /// Apply field-by-field and stamp `last_modified`
    pub fn apply_to(&self, record: &mut ContentRecord, now: DateTime<Utc>) {
        if let Some(content) = &self.content {
            record.content = content.clone();
        }
        if let Some(content_type) = self.content_type {
            record.content_type = content_type;
        }
        if let Some(page) = &self.page {
            record.page = page.clone();
        }
        if let Some(media_id) = &self.media_id {
            record.media_id = Some(media_id.clone());
        }
        if let Some(alt) = &self.alt {
            record.alt = Some(alt.clone());
        }
        record.last_modified = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MediaType {
    Image,
    Video,
}

/// Uploaded asset known to the media library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub media_id: String,
    pub url: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Media registration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    pub url: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Media listing filter, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaQuery {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl MediaQuery {
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            limit: None,
        }
    }

    /// Requested limit, clamped to `MAX_MEDIA_PAGE_SIZE`
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(MAX_MEDIA_PAGE_SIZE)
            .min(MAX_MEDIA_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ContentRecord {
        ContentWrite::new("home.hero.title", "Welcome", ContentType::Text, "home")
            .into_record(1, Utc::now())
    }

    #[test]
    fn test_content_type_wire_names() {
        let json = serde_json::to_string(&ContentType::ImageSlider).unwrap();
        assert_eq!(json, "\"imageSlider\"");
        assert_eq!("richText".parse::<ContentType>(), Ok(ContentType::RichText));
        assert!("video".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_patch_copies_only_present_fields() {
        let mut rec = record();
        let created = rec.created_at;

        let patch = ContentPatch {
            alt: Some("Students on the lawn".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut rec, Utc::now());

        assert_eq!(rec.content, "Welcome");
        assert_eq!(rec.page, "home");
        assert_eq!(rec.alt.as_deref(), Some("Students on the lawn"));
        assert_eq!(rec.created_at, created);
        assert!(rec.last_modified >= created);
    }

    #[test]
    fn test_record_serializes_with_type_key() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["id"], "home.hero.title");
        assert!(json.get("lastModified").is_some());
        assert!(json.get("mediaId").is_none());
    }

    #[test]
    fn test_media_query_limit_is_clamped() {
        let query = MediaQuery {
            tag: None,
            limit: Some(500),
        };
        assert_eq!(query.effective_limit(), MAX_MEDIA_PAGE_SIZE);
        assert_eq!(MediaQuery::default().effective_limit(), MAX_MEDIA_PAGE_SIZE);
        assert_eq!(
            MediaQuery {
                tag: None,
                limit: Some(3)
            }
            .effective_limit(),
            3
        );
    }
}
