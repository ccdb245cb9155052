//! Client-side feed state: tag filtering and view modes
//!
//! Works over an already-aggregated feed; nothing here re-fetches or
//! re-sorts. Filtering derives a new view each time, the underlying
//! feed never changes.

use super::ContentEntry;

/// How densely the feed is rendered. Changing the mode never changes
/// which entries are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
    Compact,
}

impl ViewMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Compact => "compact",
        }
    }
}

/// Per-page view state over the aggregated feed
pub struct FeedController {
    feed: Vec<ContentEntry>,
    active_tag: Option<String>,
    view_mode: ViewMode,
}

impl FeedController {
    /// Wrap an aggregated feed with default view state
    pub fn new(feed: Vec<ContentEntry>) -> Self {
        Self {
            feed,
            active_tag: None,
            view_mode: ViewMode::default(),
        }
    }

    /// Currently selected tag, if any
    pub fn active_tag(&self) -> Option<&str> {
        self.active_tag.as_deref()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Select a tag filter. Selecting the tag that is already active
    /// deselects it (select-to-deselect); selecting a different tag
    /// replaces the filter.
    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.active_tag = match (tag, self.active_tag.as_deref()) {
            (Some(selected), Some(active)) if selected == active => None,
            (selected, _) => selected.map(str::to_string),
        };
    }

    /// Switch rendering density. Purely presentational; entry
    /// inclusion and order are untouched.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Entries visible under the current filter, in feed order
    pub fn visible_entries(&self) -> Vec<&ContentEntry> {
        match self.active_tag.as_deref() {
            Some(tag) => self.feed.iter().filter(|e| e.has_tag(tag)).collect(),
            None => self.feed.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ContentType;
    use chrono::{Local, TimeZone};

    fn entry(slug: &str, day: u32, tags: &[&str]) -> ContentEntry {
        ContentEntry {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: Local.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            excerpt: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            content_type: ContentType::Blog,
            href: format!("/posts/{}", slug),
        }
    }

    fn controller() -> FeedController {
        FeedController::new(vec![
            entry("b", 20, &["rust"]),
            entry("a", 10, &["rust", "web"]),
            entry("c", 5, &["web"]),
        ])
    }

    #[test]
    fn test_no_filter_shows_full_feed_in_order() {
        let ctl = controller();
        let slugs: Vec<_> = ctl.visible_entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_tag_filter_preserves_order() {
        let mut ctl = controller();
        ctl.set_tag(Some("web"));
        let slugs: Vec<_> = ctl.visible_entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "c"]);
    }

    #[test]
    fn test_reselecting_active_tag_clears_filter() {
        let mut ctl = controller();
        ctl.set_tag(Some("rust"));
        assert_eq!(ctl.active_tag(), Some("rust"));

        ctl.set_tag(Some("rust"));
        assert_eq!(ctl.active_tag(), None);
        assert_eq!(ctl.visible_entries().len(), 3);
    }

    #[test]
    fn test_selecting_different_tag_replaces_filter() {
        let mut ctl = controller();
        ctl.set_tag(Some("rust"));
        ctl.set_tag(Some("web"));
        assert_eq!(ctl.active_tag(), Some("web"));
    }

    #[test]
    fn test_clearing_with_none() {
        let mut ctl = controller();
        ctl.set_tag(Some("rust"));
        ctl.set_tag(None);
        assert_eq!(ctl.active_tag(), None);
    }

    #[test]
    fn test_view_mode_does_not_touch_visibility() {
        let mut ctl = controller();
        ctl.set_tag(Some("web"));
        let before: Vec<String> = ctl
            .visible_entries()
            .iter()
            .map(|e| e.slug.clone())
            .collect();

        ctl.set_view_mode(ViewMode::Compact);
        let after: Vec<String> = ctl
            .visible_entries()
            .iter()
            .map(|e| e.slug.clone())
            .collect();

        assert_eq!(before, after);
        assert_eq!(ctl.view_mode(), ViewMode::Compact);
    }
}
