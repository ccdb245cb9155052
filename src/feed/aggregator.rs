//! Unified feed aggregation
//!
//! Fetches every configured collection concurrently, stamps each item
//! with its content type and canonical route, and merges the lot into
//! one date-descending feed. Failures are isolated per collection: a
//! collection that errors or exceeds its fetch timeout contributes no
//! entries and one recorded warning, never an empty feed.

use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::CollectionConfig;
use crate::content::{ContentError, ContentItem, ContentLoader};
use crate::Folio;

use super::{ContentEntry, ContentType};

type FetchResult = Result<Vec<ContentItem>, ContentError>;

/// Result of one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct FeedOutcome {
    /// Merged entries, date descending; ties keep collection order,
    /// then fetch order within a collection
    pub entries: Vec<ContentEntry>,
    /// One message per collection that failed to contribute
    pub warnings: Vec<String>,
}

impl FeedOutcome {
    /// Every tag present in the feed, insertion-ordered, with counts
    pub fn tag_index(&self) -> indexmap::IndexMap<String, usize> {
        let mut tags = indexmap::IndexMap::new();
        for entry in &self.entries {
            for tag in &entry.tags {
                *tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        tags
    }
}

/// Aggregate all configured collections into one feed.
///
/// Pure with respect to its inputs: no caching, every call re-fetches.
pub async fn aggregate(folio: &Folio) -> FeedOutcome {
    let collections = folio.config.collections.clone();
    aggregate_collections(folio, &collections).await
}

/// Aggregate an explicit, ordered set of collections
pub async fn aggregate_collections(
    folio: &Folio,
    collections: &[CollectionConfig],
) -> FeedOutcome {
    let timeout = Duration::from_millis(folio.config.fetch_timeout_ms);

    // The loader is blocking filesystem work, so it runs on the
    // blocking pool
    let folio = folio.clone();
    aggregate_with(collections, timeout, move |collection| {
        let folio = folio.clone();
        let dir = collection.dir.clone();
        tokio::task::spawn_blocking(move || {
            let loader = ContentLoader::new(&folio);
            loader.list_all(&dir)
        })
    })
    .await
}

/// Aggregation core over an arbitrary fetch function; one concurrent
/// fetch task per collection
async fn aggregate_with<F>(
    collections: &[CollectionConfig],
    timeout: Duration,
    fetch: F,
) -> FeedOutcome
where
    F: Fn(&CollectionConfig) -> JoinHandle<FetchResult>,
{
    // Fan out before joining anything
    let mut handles = Vec::with_capacity(collections.len());
    for collection in collections {
        handles.push((collection.clone(), fetch(collection)));
    }

    // Join in request order so ties sort by collection position
    let mut outcome = FeedOutcome::default();
    for (collection, task) in handles {
        let fetched = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                record_warning(
                    &mut outcome,
                    &collection.dir,
                    format!("fetch task failed: {}", join_err),
                );
                continue;
            }
            Err(_) => {
                record_warning(
                    &mut outcome,
                    &collection.dir,
                    format!("fetch timed out after {:?}", timeout),
                );
                continue;
            }
        };

        match fetched {
            Ok(items) => {
                outcome.entries.extend(
                    items
                        .iter()
                        .map(|item| ContentEntry::from_item(item, &collection.dir, collection.kind)),
                );
            }
            Err(e) => {
                record_warning(&mut outcome, &collection.dir, e.to_string());
            }
        }
    }

    // Stable sort: entries sharing a date keep the collection-then-
    // fetch order established above
    outcome.entries.sort_by(|a, b| b.date.cmp(&a.date));

    tracing::debug!(
        "Aggregated {} entries from {} collections ({} warnings)",
        outcome.entries.len(),
        collections.len(),
        outcome.warnings.len()
    );

    outcome
}

fn record_warning(outcome: &mut FeedOutcome, dir: &str, message: String) {
    tracing::warn!("Collection '{}' dropped from feed: {}", dir, message);
    outcome.warnings.push(format!("{}: {}", dir, message));
}

/// Aggregate the feed for a given entry type only
pub async fn aggregate_of_type(folio: &Folio, kind: ContentType) -> FeedOutcome {
    let collections: Vec<CollectionConfig> = folio
        .config
        .collections
        .iter()
        .filter(|c| c.kind == kind)
        .cloned()
        .collect();
    aggregate_collections(folio, &collections).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_item(source_dir: &Path, collection: &str, name: &str, body: &str) {
        let dir = source_dir.join(collection);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), body).unwrap();
    }

    fn site(base: &Path) -> Folio {
        fs::create_dir_all(base.join("source")).unwrap();
        Folio::new(base).unwrap()
    }

    #[tokio::test]
    async fn test_merged_feed_sorted_date_descending() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        write_item(
            &folio.source_dir,
            "posts",
            "a.md",
            "---\ntitle: A\ndate: 2024-01-01\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "essays",
            "b.md",
            "---\ntitle: B\ndate: 2024-06-01\n---\nBody.",
        );

        let outcome = aggregate(&folio).await;
        assert!(outcome.warnings.is_empty());
        let slugs: Vec<_> = outcome.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);
        assert_eq!(outcome.entries[0].content_type, ContentType::Essay);
        assert_eq!(outcome.entries[0].href, "/essays/b");
    }

    #[tokio::test]
    async fn test_equal_dates_keep_collection_order() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        // Same date everywhere; posts is configured before essays
        write_item(
            &folio.source_dir,
            "essays",
            "late.md",
            "---\ntitle: Late\ndate: 2024-03-01\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "posts",
            "first.md",
            "---\ntitle: First\ndate: 2024-03-01\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "posts",
            "second.md",
            "---\ntitle: Second\ndate: 2024-03-01\n---\nBody.",
        );

        let outcome = aggregate(&folio).await;
        let slugs: Vec<_> = outcome.entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "late"]);
    }

    #[tokio::test]
    async fn test_aggregate_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        write_item(
            &folio.source_dir,
            "posts",
            "x.md",
            "---\ntitle: X\ndate: 2024-02-02\ntags: [rust]\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "portfolio",
            "y.md",
            "---\ntitle: Y\ndate: 2024-05-05\n---\nBody.",
        );

        let first = aggregate(&folio).await;
        let second = aggregate(&folio).await;

        let key = |o: &FeedOutcome| {
            o.entries
                .iter()
                .map(|e| (e.slug.clone(), e.content_type))
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&first), key(&second));
    }

    #[tokio::test]
    async fn test_failed_collection_is_isolated() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        write_item(
            &folio.source_dir,
            "posts",
            "ok.md",
            "---\ntitle: Ok\ndate: 2024-01-01\n---\nBody.",
        );
        // A plain file where the collection directory should be makes
        // that collection unreadable
        fs::write(folio.source_dir.join("essays"), "not a directory").unwrap();

        let outcome = aggregate(&folio).await;
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].slug, "ok");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("essays:"));
    }

    #[tokio::test]
    async fn test_timed_out_collection_records_warning() {
        use chrono::Local;

        let collections = vec![
            CollectionConfig {
                dir: "posts".to_string(),
                kind: ContentType::Blog,
            },
            CollectionConfig {
                dir: "essays".to_string(),
                kind: ContentType::Essay,
            },
        ];

        // One fetch answers immediately, the other outlives the bound
        let outcome = aggregate_with(&collections, Duration::from_millis(50), |collection| {
            let dir = collection.dir.clone();
            tokio::spawn(async move {
                if dir == "essays" {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                }
                let mut item =
                    ContentItem::new("Quick".to_string(), Local::now(), "quick.md".to_string());
                item.slug = format!("{}-item", dir);
                Ok::<_, ContentError>(vec![item])
            })
        })
        .await;

        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].slug, "posts-item");
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("essays:"));
        assert!(outcome.warnings[0].contains("timed out"));
    }

    #[tokio::test]
    async fn test_tag_index_counts() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        write_item(
            &folio.source_dir,
            "posts",
            "one.md",
            "---\ntitle: One\ndate: 2024-04-01\ntags: [rust, web]\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "posts",
            "two.md",
            "---\ntitle: Two\ndate: 2024-03-01\ntags: [rust]\n---\nBody.",
        );

        let outcome = aggregate(&folio).await;
        let tags = outcome.tag_index();
        assert_eq!(tags.get("rust"), Some(&2));
        assert_eq!(tags.get("web"), Some(&1));
    }

    #[tokio::test]
    async fn test_aggregate_of_type_filters_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let folio = site(tmp.path());
        write_item(
            &folio.source_dir,
            "posts",
            "p.md",
            "---\ntitle: P\ndate: 2024-01-01\n---\nBody.",
        );
        write_item(
            &folio.source_dir,
            "essays",
            "e.md",
            "---\ntitle: E\ndate: 2024-01-02\n---\nBody.",
        );

        let outcome = aggregate_of_type(&folio, ContentType::Essay).await;
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].slug, "e");
    }
}
