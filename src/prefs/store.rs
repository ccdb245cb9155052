//! Process-wide preference store
//!
//! Single source of truth for reader preferences. Consumers subscribe
//! for change notifications (observer list, called synchronously in
//! registration order); preference-setting code calls `set` with a
//! partial update. Every committed update schedules a best-effort
//! durable write.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::storage::PreferenceStorage;
use super::{PreferenceRecord, PreferenceUpdate};

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&PreferenceRecord) + Send + Sync>;

struct StoreInner {
    record: PreferenceRecord,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
    /// Set while a notification pass is running; `set` calls made by
    /// listeners during that pass are queued instead of recursing.
    notifying: bool,
    queued: VecDeque<PreferenceUpdate>,
}

/// The preference store. Construct once per process and share via `Arc`.
pub struct PreferenceStore {
    inner: Mutex<StoreInner>,
    storage: PreferenceStorage,
    hydrated: AtomicBool,
}

impl PreferenceStore {
    /// Store backed by durable storage under the given site directory
    pub fn new(storage: PreferenceStorage) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                record: PreferenceRecord::default(),
                listeners: Vec::new(),
                next_id: 0,
                notifying: false,
                queued: VecDeque::new(),
            }),
            storage,
            hydrated: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A listener that panicked should not wedge the whole store
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current preference record
    pub fn get(&self) -> PreferenceRecord {
        self.lock().record
    }

    /// Apply a partial update and notify subscribers synchronously.
    ///
    /// No validation happens here: an out-of-range font scale is stored
    /// as-is and simply never applied by the font-scale effect. Calls
    /// made from inside a listener are queued and committed after the
    /// current notification pass finishes.
    pub fn set(&self, update: PreferenceUpdate) {
        let record = {
            let mut inner = self.lock();
            if inner.notifying {
                inner.queued.push_back(update);
                return;
            }
            inner.notifying = true;
            inner.record = update.apply_to(&inner.record);
            inner.record
        };

        let last = self.drain_notifications(record);
        self.schedule_persist(last);
    }

    /// Notify for `record`, then keep committing queued updates until
    /// the queue is empty. Returns the final committed record.
    fn drain_notifications(&self, mut record: PreferenceRecord) -> PreferenceRecord {
        loop {
            // Snapshot the listener list so listeners can subscribe,
            // unsubscribe, or call `set` without deadlocking.
            let listeners: Vec<Listener> = {
                let inner = self.lock();
                inner.listeners.iter().map(|(_, l)| l.clone()).collect()
            };
            for listener in &listeners {
                listener(&record);
            }

            let mut inner = self.lock();
            match inner.queued.pop_front() {
                Some(update) => {
                    inner.record = update.apply_to(&inner.record);
                    record = inner.record;
                }
                None => {
                    inner.notifying = false;
                    return record;
                }
            }
        }
    }

    /// Register a change listener; called in registration order
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&PreferenceRecord) + Send + Sync + 'static,
    {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a previously registered listener
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut inner = self.lock();
        inner.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Load the persisted record into the store, exactly once.
    ///
    /// The first call reads durable storage and commits the result
    /// (defaults when the file is missing or corrupt); every later call
    /// is a no-op. Safe to call from a context with no storage at all.
    pub fn hydrate_once(&self) {
        if self.hydrated.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some(record) = self.storage.load() else {
            tracing::debug!("No persisted preferences, keeping defaults");
            return;
        };

        tracing::debug!("Hydrated preferences: {:?}", record);
        let committed = {
            let mut inner = self.lock();
            inner.notifying = true;
            inner.record = record;
            inner.record
        };
        // Hydration only loads what storage already holds, so there is
        // nothing to write back afterwards.
        self.drain_notifications(committed);
    }

    /// Reset to defaults, notify, and persist
    pub fn reset(&self) {
        let defaults = PreferenceRecord::default();
        self.set(PreferenceUpdate {
            font_scale: Some(defaults.font_scale),
            color_vision_mode: Some(defaults.color_vision_mode),
            theme_mode: Some(defaults.theme_mode),
        });
    }

    /// Synchronously write the current record to durable storage.
    ///
    /// `set` already schedules a background write; this exists for
    /// process shutdown, where a scheduled write could otherwise be
    /// lost to exit.
    pub fn flush(&self) -> anyhow::Result<()> {
        let record = self.get();
        self.storage.save(&record)
    }

    /// Schedule a durable write of the committed record. Failures are
    /// logged and swallowed; persistence is best-effort.
    fn schedule_persist(&self, record: PreferenceRecord) {
        let storage = self.storage.clone();
        let write = move || {
            if let Err(e) = storage.save(&record) {
                tracing::warn!("Failed to persist preferences: {}", e);
            }
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(write);
            }
            // No runtime (e.g. unit tests): write inline
            Err(_) => write(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{ColorVisionMode, ThemeMode};
    use std::fs;
    use std::sync::atomic::AtomicUsize;

    fn store() -> PreferenceStore {
        PreferenceStore::new(PreferenceStorage::disabled())
    }

    #[test]
    fn test_set_merges_and_notifies_in_order() {
        let store = store();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o1 = order.clone();
        store.subscribe(move |_| o1.lock().unwrap().push("first"));
        let o2 = order.clone();
        store.subscribe(move |_| o2.lock().unwrap().push("second"));

        store.set(PreferenceUpdate {
            theme_mode: Some(ThemeMode::Dark),
            ..Default::default()
        });

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(store.get().theme_mode, ThemeMode::Dark);
        assert_eq!(store.get().font_scale, 1.0);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = store();
        let count = Arc::new(AtomicUsize::new(0));

        let c = count.clone();
        let id = store.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        store.set(PreferenceUpdate {
            font_scale: Some(1.1),
            ..Default::default()
        });
        store.unsubscribe(id);
        store.set(PreferenceUpdate {
            font_scale: Some(1.2),
            ..Default::default()
        });

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_set_is_queued_not_recursive() {
        let store = Arc::new(store());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let inner_store = store.clone();
        let seen_clone = seen.clone();
        store.subscribe(move |record| {
            seen_clone.lock().unwrap().push(record.font_scale);
            // Push the scale up once; the nested set must not re-enter
            if record.font_scale < 1.2 {
                inner_store.set(PreferenceUpdate {
                    font_scale: Some(1.2),
                    ..Default::default()
                });
            }
        });

        store.set(PreferenceUpdate {
            font_scale: Some(1.1),
            ..Default::default()
        });

        // Two distinct notification passes, in commit order
        assert_eq!(*seen.lock().unwrap(), vec![1.1, 1.2]);
        assert_eq!(store.get().font_scale, 1.2);
    }

    #[test]
    fn test_hydrate_once_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PreferenceStorage::new(dir.path());
        storage
            .save(&PreferenceRecord {
                font_scale: 1.3,
                color_vision_mode: ColorVisionMode::Protanopia,
                theme_mode: ThemeMode::Dark,
            })
            .unwrap();

        let store = PreferenceStore::new(storage);
        store.hydrate_once();
        let first = store.get();
        store.hydrate_once();
        let second = store.get();

        assert_eq!(first, second);
        assert_eq!(first.font_scale, 1.3);
        assert_eq!(first.color_vision_mode, ColorVisionMode::Protanopia);
    }

    #[test]
    fn test_hydrate_corrupt_storage_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let state_dir = dir.path().join(crate::prefs::STATE_DIR);
        fs::create_dir_all(&state_dir).unwrap();
        fs::write(state_dir.join("prefs.json"), "garbage").unwrap();

        let store = PreferenceStore::new(PreferenceStorage::new(dir.path()));
        store.hydrate_once();

        assert_eq!(store.get(), PreferenceRecord::default());
    }

    #[test]
    fn test_hydrate_notifies_existing_subscribers() {
        let dir = tempfile::tempdir().unwrap();
        let storage = PreferenceStorage::new(dir.path());
        storage
            .save(&PreferenceRecord {
                font_scale: 1.4,
                ..Default::default()
            })
            .unwrap();

        let store = PreferenceStore::new(storage);
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        store.subscribe(move |record| {
            *s.lock().unwrap() = Some(record.font_scale);
        });

        store.hydrate_once();
        assert_eq!(*seen.lock().unwrap(), Some(1.4));
    }

    #[tokio::test]
    async fn test_set_persists_to_storage() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(PreferenceStorage::new(dir.path()));

        store.set(PreferenceUpdate {
            theme_mode: Some(ThemeMode::HighContrast),
            ..Default::default()
        });

        // The write runs on the blocking pool; give it a moment
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            if PreferenceStorage::new(dir.path()).load().is_some() {
                break;
            }
        }

        let loaded = PreferenceStorage::new(dir.path()).load();
        assert_eq!(loaded.map(|r| r.theme_mode), Some(ThemeMode::HighContrast));
    }
}
