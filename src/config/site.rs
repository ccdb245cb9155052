//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::feed::ContentType;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,

    // Content collections that feed the unified stream, in the order
    // they should tie-break when dates match
    pub collections: Vec<CollectionConfig>,

    // Writing
    pub render_drafts: bool,

    // Aggregation
    /// Upper bound on a single collection fetch, in milliseconds
    pub fetch_timeout_ms: u64,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// One content collection: a source subdirectory plus the content type
/// the aggregator stamps on its items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub dir: String,
    pub kind: ContentType,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),

            collections: vec![
                CollectionConfig {
                    dir: "posts".to_string(),
                    kind: ContentType::Blog,
                },
                CollectionConfig {
                    dir: "essays".to_string(),
                    kind: ContentType::Essay,
                },
                CollectionConfig {
                    dir: "portfolio".to_string(),
                    kind: ContentType::Portfolio,
                },
                CollectionConfig {
                    dir: "case-studies".to_string(),
                    kind: ContentType::CaseStudy,
                },
            ],

            render_drafts: false,

            fetch_timeout_ms: 10_000,

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Find a configured collection by its directory name
    pub fn collection(&self, dir: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.dir == dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Folio");
        assert_eq!(config.collections.len(), 4);
        assert_eq!(config.fetch_timeout_ms, 10_000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Site
author: Test User
render_drafts: true
collections:
  - dir: notes
    kind: blog
  - dir: talks
    kind: essay
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Site");
        assert!(config.render_drafts);
        assert_eq!(config.collections.len(), 2);
        assert_eq!(config.collections[0].dir, "notes");
        assert_eq!(config.collections[1].kind, ContentType::Essay);
    }

    #[test]
    fn test_collection_lookup() {
        let config = SiteConfig::default();
        assert_eq!(
            config.collection("posts").map(|c| c.kind),
            Some(ContentType::Blog)
        );
        assert!(config.collection("podcasts").is_none());
    }
}
