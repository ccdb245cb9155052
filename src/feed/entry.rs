//! Aggregated feed entries

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::content::ContentItem;

/// The kind of content a feed entry came from.
///
/// Raw content items carry no type; the aggregator assigns one based on
/// which collection the item was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Blog,
    Essay,
    Portfolio,
    CaseStudy,
}

impl ContentType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blog" => Some(Self::Blog),
            "essay" => Some(Self::Essay),
            "portfolio" => Some(Self::Portfolio),
            "case-study" => Some(Self::CaseStudy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Essay => "essay",
            Self::Portfolio => "portfolio",
            Self::CaseStudy => "case-study",
        }
    }
}

/// One entry in the unified feed: a read-only view over a content item,
/// tagged with its source type and canonical route. Entries are built
/// once per aggregation and never mutated - filtering and view changes
/// derive new sequences instead.
#[derive(Debug, Clone, Serialize)]
pub struct ContentEntry {
    pub slug: String,
    pub title: String,
    pub date: DateTime<Local>,
    pub excerpt: Option<String>,
    pub tags: Vec<String>,
    pub content_type: ContentType,
    /// Canonical route, `/{collection}/{slug}`
    pub href: String,
}

impl ContentEntry {
    /// Build an entry from a loaded item
    pub fn from_item(item: &ContentItem, collection_dir: &str, content_type: ContentType) -> Self {
        Self {
            slug: item.slug.clone(),
            title: item.title.clone(),
            date: item.date,
            excerpt: item.excerpt.clone(),
            tags: item.tags.clone(),
            content_type,
            href: format!("/{}/{}", collection_dir.trim_matches('/'), item.slug),
        }
    }

    /// Whether this entry carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_href_is_collection_then_slug() {
        let mut item = ContentItem::new("Hello".into(), Local::now(), "hello.md".into());
        item.slug = "hello-world".into();

        let entry = ContentEntry::from_item(&item, "posts", ContentType::Blog);
        assert_eq!(entry.href, "/posts/hello-world");
        assert_eq!(entry.content_type, ContentType::Blog);
    }

    #[test]
    fn test_content_type_names() {
        assert_eq!(ContentType::parse("case-study"), Some(ContentType::CaseStudy));
        assert_eq!(ContentType::CaseStudy.as_str(), "case-study");
        assert_eq!(ContentType::parse("podcast"), None);
    }
}
