//! Unified content feed - aggregation and client-side view state

pub mod aggregator;
mod controller;
mod entry;

pub use aggregator::{aggregate, aggregate_collections, aggregate_of_type, FeedOutcome};
pub use controller::{FeedController, ViewMode};
pub use entry::{ContentEntry, ContentType};
