//! Bidirectional tag registry.
//!
//! Tracks which cache keys carry which tags so that invalidating a tag can
//! find every affected entry, and removing an entry can clean up its tags.
//! The registry is owned by [`super::MemoStore`] and guarded by its lock.

use std::collections::{HashMap, HashSet};

use super::keys::{CacheKey, CacheTag};

#[derive(Debug, Default)]
pub struct CacheRegistry {
    tag_to_keys: HashMap<CacheTag, HashSet<CacheKey>>,
    key_to_tags: HashMap<CacheKey, HashSet<CacheTag>>,
}

impl CacheRegistry {
    /// Register a cache key under its tags, replacing any previous tag set.
    pub fn register(&mut self, key: CacheKey, tags: impl IntoIterator<Item = CacheTag>) {
        self.unregister(&key);
        let tags: HashSet<CacheTag> = tags.into_iter().collect();
        for tag in &tags {
            self.tag_to_keys
                .entry(*tag)
                .or_default()
                .insert(key.clone());
        }
        self.key_to_tags.insert(key, tags);
    }

    pub fn keys_for_tag(&self, tag: CacheTag) -> HashSet<CacheKey> {
        self.tag_to_keys.get(&tag).cloned().unwrap_or_default()
    }

    #[cfg(test)]
    fn tags_for_key(&self, key: &CacheKey) -> HashSet<CacheTag> {
        self.key_to_tags.get(key).cloned().unwrap_or_default()
    }

    /// Remove a cache key and drop it from every tag it was registered under.
    pub fn unregister(&mut self, key: &CacheKey) {
        if let Some(tags) = self.key_to_tags.remove(key) {
            for tag in tags {
                if let Some(keys) = self.tag_to_keys.get_mut(&tag) {
                    keys.remove(key);
                    if keys.is_empty() {
                        self.tag_to_keys.remove(&tag);
                    }
                }
            }
        }
    }

    /// Remove a tag and every key registered under it.
    ///
    /// Keys that also carry other tags are removed from those tags too, since
    /// the entry itself is gone. Returns the removed keys.
    pub fn unregister_tag(&mut self, tag: CacheTag) -> HashSet<CacheKey> {
        let affected = self.tag_to_keys.remove(&tag).unwrap_or_default();
        for key in &affected {
            self.unregister(key);
        }
        affected
    }
}
