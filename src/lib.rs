//! folio: a personal publishing engine
//!
//! Renders content collections from a file-based store into one
//! unified, filterable feed, and manages persisted reader preferences
//! (font scale, color-vision accommodation, theme) applied to the
//! document through scoped effects.

pub mod commands;
pub mod config;
pub mod content;
pub mod document;
pub mod feed;
pub mod prefs;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use prefs::{PreferenceStorage, PreferenceStore};

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Source directory holding the content collections
    pub source_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
        })
    }

    /// Build the process-wide preference store, hydrated from the
    /// site's durable storage
    pub fn preference_store(&self) -> Arc<PreferenceStore> {
        let store = Arc::new(PreferenceStore::new(PreferenceStorage::new(&self.base_dir)));
        store.hydrate_once();
        store
    }

    /// Aggregate the unified feed
    pub async fn feed(&self) -> feed::FeedOutcome {
        feed::aggregate(self).await
    }
}
