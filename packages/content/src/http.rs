//! REST client for a remote content store.
//!
//! Talks to the `/api/v1/content` endpoints served by `campus-server`.
//! Writes carry the editor token as a bearer credential when one is set.

use crate::record::{ContentPatch, ContentRecord, ContentWrite};
use crate::store::{ContentChange, ContentStore};
use crate::{ContentError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Body of a PUT, the id travels in the path
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteBody<'a> {
    content: &'a str,
    #[serde(rename = "type")]
    content_type: crate::ContentType,
    page: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alt: Option<&'a str>,
}

pub struct HttpContentStore {
    client: Client,
    base_url: Url,
    token: Option<String>,
    changes: broadcast::Sender<ContentChange>,
}

impl HttpContentStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let invalid = |reason: String| ContentError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            client: Client::new(),
            base_url: parsed,
            token: None,
            changes,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// `<base>/api/v1/content[/<id>]`, with the id percent-encoded as one segment
    fn content_url(&self, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ContentError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "v1", "content"])
            .extend(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn publish(&self, record: &ContentRecord) {
        // Only our own writes are visible here
        let _ = self.changes.send(ContentChange {
            id: record.id.clone(),
            page: record.page.clone(),
        });
    }
}

async fn check(response: Response, id: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::NOT_FOUND => Err(ContentError::NotFound(id.to_string())),
        StatusCode::UNAUTHORIZED => Err(ContentError::Unauthorized),
        _ => {
            let message = response.text().await.unwrap_or_default();
            Err(ContentError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn read(&self, id: &str) -> Result<Option<ContentRecord>> {
        let response = self.client.get(self.content_url(Some(id))?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let record = check(response, id).await?.json::<ContentRecord>().await?;
        Ok(Some(record))
    }

    async fn write(&self, write: ContentWrite) -> Result<ContentRecord> {
        if write.id.is_empty() {
            return Err(ContentError::EmptyId);
        }

        let body = WriteBody {
            content: &write.content,
            content_type: write.content_type,
            page: &write.page,
            media_id: write.media_id.as_deref(),
            alt: write.alt.as_deref(),
        };
        let request = self.client.put(self.content_url(Some(&write.id))?).json(&body);
        let response = self.authorize(request).send().await?;
        let record = check(response, &write.id)
            .await?
            .json::<ContentRecord>()
            .await?;

        tracing::debug!(id = %record.id, "content written to remote store");
        self.publish(&record);
        Ok(record)
    }

    async fn patch(&self, id: &str, patch: ContentPatch) -> Result<ContentRecord> {
        let request = self.client.patch(self.content_url(Some(id))?).json(&patch);
        let response = self.authorize(request).send().await?;
        let record = check(response, id).await?.json::<ContentRecord>().await?;

        self.publish(&record);
        Ok(record)
    }

    async fn list_page(&self, page: &str) -> Result<Vec<ContentRecord>> {
        let response = self
            .client
            .get(self.content_url(None)?)
            .query(&[("page", page)])
            .send()
            .await?;
        let records = check(response, page)
            .await?
            .json::<Vec<ContentRecord>>()
            .await?;
        Ok(records)
    }

    fn subscribe(&self) -> broadcast::Receiver<ContentChange> {
        self.changes.subscribe()
    }
}
