//! CLI command implementations

pub mod clean;
pub mod feed;
pub mod list;
pub mod prefs;
pub mod show;
