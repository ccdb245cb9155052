//! Content item model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A raw content item loaded from the store.
///
/// Items carry no notion of which collection they belong to; the feed
/// aggregator stamps that on when it builds entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Item title
    pub title: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Last updated date
    pub updated: Option<DateTime<Local>>,

    /// Raw markdown body
    pub raw: String,

    /// Excerpt in markdown (explicit front-matter excerpt, the part
    /// before `<!-- more -->`, or the first paragraph)
    pub excerpt: Option<String>,

    /// Item tags
    pub tags: Vec<String>,

    /// Source file path (relative to the collection directory)
    pub source: String,

    /// Whether the item is published
    pub published: bool,

    /// Slug (URL-friendly name, derived from the filename)
    pub slug: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl ContentItem {
    /// Create a new item with minimal required fields
    pub fn new(title: String, date: DateTime<Local>, source: String) -> Self {
        let slug = slug::slugify(&title);
        Self {
            title,
            date,
            updated: None,
            raw: String::new(),
            excerpt: None,
            tags: Vec::new(),
            source,
            published: true,
            slug,
            extra: HashMap::new(),
        }
    }
}
