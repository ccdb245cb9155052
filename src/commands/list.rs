//! List site content

use anyhow::{anyhow, Result};

use crate::content::ContentLoader;
use crate::feed::{aggregate_of_type, ContentType};
use crate::Folio;

/// List site content by type
pub async fn run(folio: &Folio, what: &str) -> Result<()> {
    match what {
        "collections" => {
            println!("Collections ({}):", folio.config.collections.len());
            let loader = ContentLoader::new(folio);
            for collection in &folio.config.collections {
                let count = loader
                    .list_all(&collection.dir)
                    .map(|items| items.len())
                    .unwrap_or(0);
                println!(
                    "  {} [{}] - {} items",
                    collection.dir,
                    collection.kind.as_str(),
                    count
                );
            }
        }
        "tags" => {
            let outcome = folio.feed().await;
            let mut tags: Vec<_> = outcome.tag_index().into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        "entries" => {
            let outcome = folio.feed().await;
            println!("Entries ({}):", outcome.entries.len());
            for entry in &outcome.entries {
                println!(
                    "  {} - {} [{}]",
                    entry.date.format("%Y-%m-%d"),
                    entry.title,
                    entry.content_type.as_str()
                );
            }
        }
        other => {
            // A content type name lists just that slice of the feed
            let Some(kind) = ContentType::parse(other) else {
                return Err(anyhow!(
                    "unknown list type '{}' (expected collections, tags, entries, or a content type)",
                    other
                ));
            };
            let outcome = aggregate_of_type(folio, kind).await;
            println!("{} entries ({}):", kind.as_str(), outcome.entries.len());
            for entry in &outcome.entries {
                println!(
                    "  {} - {} {}",
                    entry.date.format("%Y-%m-%d"),
                    entry.title,
                    entry.href
                );
            }
        }
    }

    Ok(())
}
