//! Content loader - the file-based content store
//!
//! One collection is one subdirectory of the source directory. The
//! loader guarantees stable ordering within a process: items come back
//! sorted by date descending, with walk order breaking ties.

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

use super::{ContentItem, FrontMatter, MarkdownRenderer};
use crate::Folio;

/// Content store errors
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Collection not configured: {0}")]
    UnknownCollection(String),

    #[error("Collection directory unreadable: {dir}: {source}")]
    CollectionUnreadable {
        dir: String,
        source: std::io::Error,
    },

    #[error("Not found: {collection}/{slug}")]
    NotFound { collection: String, slug: String },
}

/// Loads content items from the source directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every item in a collection, date-descending.
    ///
    /// Unparseable files are skipped with a warning; a missing
    /// collection directory is empty, but an unreadable one is an
    /// error the caller decides how to absorb.
    pub fn list_all(&self, collection: &str) -> Result<Vec<ContentItem>, ContentError> {
        if self.folio.config.collection(collection).is_none() {
            return Err(ContentError::UnknownCollection(collection.to_string()));
        }

        let dir = self.folio.source_dir.join(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        // Surface permission problems instead of silently yielding an
        // empty collection
        fs::read_dir(&dir).map_err(|e| ContentError::CollectionUnreadable {
            dir: collection.to_string(),
            source: e,
        })?;

        let mut items = Vec::new();

        for entry in WalkDir::new(&dir)
            .sort_by_file_name()
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_item(path, &dir) {
                    Ok(item) => {
                        if item.published || self.folio.config.render_drafts {
                            items.push(item);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load item {:?}: {}", path, e);
                    }
                }
            }
        }

        // Sort by date descending (newest first); sort_by is stable so
        // equal dates keep walk order
        items.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(items)
    }

    /// Look up a single item by its slug
    pub fn get_by_slug(&self, collection: &str, slug: &str) -> Result<ContentItem, ContentError> {
        let items = self.list_all(collection)?;
        items
            .into_iter()
            .find(|item| item.slug == slug)
            .ok_or_else(|| ContentError::NotFound {
                collection: collection.to_string(),
                slug: slug.to_string(),
            })
    }

    /// Load a single item from a file
    fn load_item(&self, path: &Path, collection_dir: &Path) -> Result<ContentItem> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        // Fall back to file mtime when front-matter has no date
        let metadata = fs::metadata(path)?;
        let file_modified = metadata
            .modified()
            .ok()
            .map(|t| chrono::DateTime::<Local>::from(t));

        let date = fm
            .parse_date()
            .unwrap_or_else(|| file_modified.unwrap_or_else(Local::now));
        let updated = fm.parse_updated().or(file_modified);

        let title = fm.title.unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled")
                .to_string()
        });

        let source = path
            .strip_prefix(collection_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        // The slug comes from the filename, not the title, so renaming
        // a title never breaks a route
        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(slug::slugify)
            .unwrap_or_else(|| "untitled".to_string());

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(body);
        let excerpt = fm
            .excerpt
            .or(excerpt_md)
            .or_else(|| MarkdownRenderer::first_paragraph(body))
            .map(|e| self.renderer.render_plain(&e));

        let mut item = ContentItem::new(title, date, source);
        item.updated = updated;
        item.raw = full_md;
        item.excerpt = excerpt;
        item.tags = fm.tags;
        item.published = fm.published;
        item.slug = slug;
        item.extra = fm.extra;

        Ok(item)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
