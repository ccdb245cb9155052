//! Show a single content item

use anyhow::Result;

use crate::content::{ContentLoader, MarkdownRenderer};
use crate::Folio;

/// Render one item by collection and slug.
///
/// An unknown slug surfaces as an error; the page layer treats that as
/// its not-found condition.
pub fn run(folio: &Folio, collection: &str, slug: &str, html: bool) -> Result<()> {
    let loader = ContentLoader::new(folio);
    let item = loader.get_by_slug(collection, slug)?;

    println!("# {}", item.title);
    println!("date: {}", item.date.format("%Y-%m-%d %H:%M"));
    if let Some(updated) = &item.updated {
        println!("updated: {}", updated.format("%Y-%m-%d %H:%M"));
    }
    if !item.tags.is_empty() {
        println!("tags: {}", item.tags.join(", "));
    }
    println!("source: {}/{}", collection, item.source);
    println!();

    if html {
        let renderer = MarkdownRenderer::new();
        println!("{}", renderer.render(&item.raw)?);
    } else {
        println!("{}", item.raw);
    }

    Ok(())
}
