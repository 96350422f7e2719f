//! Keyed memo storage.
//!
//! Values are stored type-erased per [`CacheKey`] and are always replaced
//! whole, so a reader racing a writer observes either the old or the new
//! value. Every tag carries an epoch that is bumped on invalidation; inserts
//! are rejected when a tag epoch moved since the load began.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::time::Instant;

use super::keys::{CacheKey, CacheTag};
use super::lock::{rw_read, rw_write};
use super::registry::CacheRegistry;

const SOURCE: &str = "cache::store";

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

#[derive(Default)]
struct MemoState {
    entries: HashMap<CacheKey, Entry>,
    registry: CacheRegistry,
    epochs: HashMap<CacheTag, u64>,
}

impl MemoState {
    fn epoch(&self, tag: CacheTag) -> u64 {
        self.epochs.get(&tag).copied().unwrap_or_default()
    }
}

/// Tag epochs captured before a load; see [`MemoStore::insert_if_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochSnapshot(Vec<(CacheTag, u64)>);

#[derive(Default)]
pub struct MemoStore {
    state: RwLock<MemoState>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stored value when present, unexpired and of type `T`.
    pub fn get<T>(&self, key: &CacheKey, now: Instant) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let state = rw_read(&self.state, SOURCE, "get");
        let entry = state.entries.get(key)?;
        if !entry.is_fresh(now) {
            return None;
        }
        entry.value.downcast_ref::<T>().cloned()
    }

    pub fn snapshot(&self, tags: &[CacheTag]) -> EpochSnapshot {
        let state = rw_read(&self.state, SOURCE, "snapshot");
        EpochSnapshot(tags.iter().map(|tag| (*tag, state.epoch(*tag))).collect())
    }

    /// Store `value` unless one of the snapshot's tags was invalidated since.
    ///
    /// Returns whether the value was stored.
    pub fn insert_if_current<T>(
        &self,
        key: CacheKey,
        snapshot: &EpochSnapshot,
        value: T,
        expires_at: Option<Instant>,
    ) -> bool
    where
        T: Send + Sync + 'static,
    {
        let mut state = rw_write(&self.state, SOURCE, "insert");
        if snapshot
            .0
            .iter()
            .any(|(tag, epoch)| state.epoch(*tag) != *epoch)
        {
            return false;
        }

        let tags: Vec<CacheTag> = snapshot.0.iter().map(|(tag, _)| *tag).collect();
        state.registry.register(key.clone(), tags);
        state.entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                expires_at,
            },
        );
        true
    }

    /// Drop every entry carrying `tag` and advance the tag's epoch.
    ///
    /// Returns the number of removed entries.
    pub fn invalidate(&self, tag: CacheTag) -> usize {
        let mut state = rw_write(&self.state, SOURCE, "invalidate");
        *state.epochs.entry(tag).or_default() += 1;
        let keys = state.registry.unregister_tag(tag);
        keys.iter()
            .filter(|key| state.entries.remove(*key).is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        rw_read(&self.state, SOURCE, "len").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> CacheKey {
        CacheKey::new([name, "all"])
    }

    #[test]
    fn stores_and_reads_typed_values() {
        let store = MemoStore::new();
        let snapshot = store.snapshot(&[CacheTag::Faqs]);
        assert!(store.insert_if_current(key("faqs"), &snapshot, vec![1_u32, 2], None));

        let now = Instant::now();
        assert_eq!(store.get::<Vec<u32>>(&key("faqs"), now), Some(vec![1, 2]));
        assert_eq!(store.get::<String>(&key("faqs"), now), None);
    }

    #[test]
    fn invalidation_is_scoped_to_the_tag() {
        let store = MemoStore::new();
        let products = store.snapshot(&[CacheTag::Products]);
        let categories = store.snapshot(&[CacheTag::Categories]);
        store.insert_if_current(key("products"), &products, 1_u8, None);
        store.insert_if_current(key("categories"), &categories, 2_u8, None);

        assert_eq!(store.invalidate(CacheTag::Products), 1);

        let now = Instant::now();
        assert_eq!(store.get::<u8>(&key("products"), now), None);
        assert_eq!(store.get::<u8>(&key("categories"), now), Some(2));
    }

    #[test]
    fn stale_snapshot_is_rejected() {
        let store = MemoStore::new();
        let snapshot = store.snapshot(&[CacheTag::Testimonials]);
        store.invalidate(CacheTag::Testimonials);

        assert!(!store.insert_if_current(key("testimonials"), &snapshot, 3_u8, None));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_misses() {
        let store = MemoStore::new();
        let snapshot = store.snapshot(&[CacheTag::Site]);
        let deadline = Instant::now() + std::time::Duration::from_secs(10);
        store.insert_if_current(key("site"), &snapshot, 7_u8, Some(deadline));

        assert_eq!(store.get::<u8>(&key("site"), Instant::now()), Some(7));
        tokio::time::advance(std::time::Duration::from_secs(11)).await;
        assert_eq!(store.get::<u8>(&key("site"), Instant::now()), None);
    }
}
