//! Content module - the file-based content store

mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use frontmatter::FrontMatter;
pub use item::ContentItem;
pub use loader::{ContentError, ContentLoader};
pub use markdown::MarkdownRenderer;
