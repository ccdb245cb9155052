//! Durable preference storage
//!
//! One JSON record per profile under `.folio/prefs.json`. Storage is
//! best-effort in both directions: a missing, corrupt, or unreadable
//! file loads as `None`, and a failed write is logged and dropped.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::PreferenceRecord;

/// State directory name under the site base directory
pub const STATE_DIR: &str = ".folio";

/// Preference file name inside the state directory
const PREFS_FILE: &str = "prefs.json";

/// On-disk envelope around the preference record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredPrefs {
    /// Version of the storage format
    version: u32,
    #[serde(flatten)]
    record: PreferenceRecord,
}

impl StoredPrefs {
    const VERSION: u32 = 1;
}

/// Handle to the durable preference file.
///
/// May be disabled, in which case loads yield nothing and saves are
/// no-ops - this is the path taken when the process has no writable
/// state directory at all.
#[derive(Debug, Clone)]
pub struct PreferenceStorage {
    path: Option<PathBuf>,
}

impl PreferenceStorage {
    /// Storage rooted at a site base directory
    pub fn new(base_dir: &Path) -> Self {
        Self {
            path: Some(base_dir.join(STATE_DIR).join(PREFS_FILE)),
        }
    }

    /// Storage that never reads or writes anything
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Load the persisted record, or `None` when absent or unusable
    pub fn load(&self) -> Option<PreferenceRecord> {
        let path = self.path.as_ref()?;
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<StoredPrefs>(&content) {
            Ok(stored) if stored.version == StoredPrefs::VERSION => Some(stored.record),
            Ok(stored) => {
                tracing::info!(
                    "Preference file version {} unsupported, using defaults",
                    stored.version
                );
                None
            }
            Err(e) => {
                tracing::warn!("Corrupt preference file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Write the record to disk
    pub fn save(&self, record: &PreferenceRecord) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let stored = StoredPrefs {
            version: StoredPrefs::VERSION,
            record: *record,
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(path, content)?;
        Ok(())
    }
}
