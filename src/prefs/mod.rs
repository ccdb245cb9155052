//! Reader preferences - record, store, and durable storage

mod record;
mod storage;
mod store;

pub use record::{ColorVisionMode, PreferenceRecord, PreferenceUpdate, ThemeMode};
pub use storage::{PreferenceStorage, STATE_DIR};
pub use store::{PreferenceStore, SubscriptionId};
