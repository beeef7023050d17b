//! Content document and list-card models

use serde::Serialize;
use serde_json::Value;

use super::Metadata;

/// One entry of the collection: header metadata plus the raw body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentDocument {
    /// File name without its extension; lookup key and route segment
    pub identifier: String,

    /// Every header key, recognised or not
    pub metadata: Metadata,

    /// Text after the header, passed untouched to the renderer
    pub body: String,
}

impl ContentDocument {
    /// Create a document from its parts
    pub fn new(identifier: impl Into<String>, metadata: Metadata, body: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            metadata,
            body: body.into(),
        }
    }

    /// A header value, if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Publication date as written in the header. Compared as a string, never parsed.
    pub fn date(&self) -> Option<&str> {
        self.get_str("date")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    pub fn image(&self) -> Option<&str> {
        self.get_str("image").filter(|s| !s.is_empty())
    }

    pub fn image_alt(&self) -> Option<&str> {
        self.get_str("image_alt").filter(|s| !s.is_empty())
    }

    /// Tags, accepting either a single string or a list of strings
    pub fn tags(&self) -> Vec<&str> {
        match self.metadata.get("tags") {
            Some(Value::String(tag)) => vec![tag.as_str()],
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Drafts stay in the collection; presentation code decides what to do with them
    pub fn is_draft(&self) -> bool {
        self.metadata
            .get("draft")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Project this document into the card shown on the list page
    pub fn summary(&self, route_prefix: &str) -> Summary {
        let title = self.title().unwrap_or(&self.identifier).to_string();
        let image = self.image().map(str::to_string);
        let image_alt = image
            .as_ref()
            .map(|_| self.image_alt().unwrap_or(&title).to_string());

        Summary {
            identifier: self.identifier.clone(),
            date: self.date().unwrap_or_default().to_string(),
            description: self.description().unwrap_or_default().to_string(),
            href: format!("{}/{}", route_prefix.trim_end_matches('/'), self.identifier),
            title,
            image,
            image_alt,
        }
    }
}

/// Data for one card on the list page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub identifier: String,
    pub title: String,
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Falls back to the title when the header gives an image but no alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    pub href: String,
}
