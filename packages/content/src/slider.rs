//! # Slider Payload
//!
//! An image slider stores every URL in one record, as a JSON array encoded
//! into the record's `content` string. Every operation is
//! read-whole-array → mutate → write-whole-array. Two sessions editing the
//! same slider race, and the last writer wins.
//!
//! An absent or blank payload is an empty slider. Anything else that is not
//! a JSON array of strings is reported as malformed rather than silently
//! treated as empty, so a bad payload is never overwritten by accident.

use crate::{ContentError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliderImages {
    urls: Vec<String>,
}

impl SliderImages {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Decode a stored payload
    pub fn parse(id: &str, content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_json::from_str::<Vec<String>>(content)
            .map(Self::new)
            .map_err(|e| ContentError::MalformedSlider {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }

    /// Encode for storage
    pub fn to_content(&self) -> String {
        // A Vec<String> always serializes
        serde_json::to_string(&self.urls).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn append(&mut self, url: impl Into<String>) {
        self.urls.push(url.into());
    }

    pub fn replace(&mut self, index: usize, url: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.urls[index] = url.into();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<String> {
        self.check_index(index)?;
        Ok(self.urls.remove(index))
    }

    /// Swap with the previous image. Index 0 is a no-op.
    pub fn move_up(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index > 0 {
            self.urls.swap(index - 1, index);
        }
        Ok(())
    }

    /// Swap with the next image. The last index is a no-op.
    pub fn move_down(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if index + 1 < self.urls.len() {
            self.urls.swap(index, index + 1);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.urls.len() {
            return Err(ContentError::IndexOutOfRange {
                index,
                len: self.urls.len(),
            });
        }
        Ok(())
    }
}
