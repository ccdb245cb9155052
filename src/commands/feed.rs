//! Print the unified feed

use anyhow::Result;

use crate::feed::{FeedController, ViewMode};
use crate::Folio;

/// Aggregate and print the feed, optionally filtered by tag
pub async fn run(folio: &Folio, tag: Option<&str>, view: ViewMode) -> Result<()> {
    let outcome = folio.feed().await;

    for warning in &outcome.warnings {
        eprintln!("warning: {}", warning);
    }

    let mut controller = FeedController::new(outcome.entries);
    controller.set_view_mode(view);
    controller.set_tag(tag);

    let entries = controller.visible_entries();
    match controller.active_tag() {
        Some(tag) => println!("Feed ({} entries, tag '{}'):", entries.len(), tag),
        None => println!("Feed ({} entries):", entries.len()),
    }

    for entry in entries {
        match controller.view_mode() {
            ViewMode::Compact => {
                println!("  {} {}", entry.date.format("%Y-%m-%d"), entry.href);
            }
            ViewMode::List => {
                println!(
                    "  {} - {} [{}] {}",
                    entry.date.format("%Y-%m-%d"),
                    entry.title,
                    entry.content_type.as_str(),
                    entry.href
                );
                if let Some(excerpt) = &entry.excerpt {
                    println!("      {}", excerpt);
                }
            }
            ViewMode::Grid => {
                println!(
                    "  [{}] {} ({})",
                    entry.content_type.as_str(),
                    entry.title,
                    entry.date.format("%Y-%m-%d")
                );
                if !entry.tags.is_empty() {
                    println!("      tags: {}", entry.tags.join(", "));
                }
            }
        }
    }

    Ok(())
}
