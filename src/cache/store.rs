//! Content Cache Module
//!
//! Public facade composing key derivation, the entry store, the index lists
//! and the expiry policy.
//!
//! Every public operation swallows internal failures: the failure is logged
//! and a safe default is returned, so a broken cache only ever looks like an
//! empty one to the story flow.

use tracing::{debug, error, info, warn};

use crate::cache::records::{self, Record};
use crate::cache::stats::ScanAccumulator;
use crate::cache::{
    index, CacheKey, CacheStats, CachedEntry, CachedImageEntry, CachedStoryEntry, ContentKind,
    ExpiryPolicy, Fingerprint, StoryDraft,
};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::storage::KeyValueStore;

// == Content Cache ==
/// TTL cache for generated stories and images over an injected store.
///
/// Records and index lists are written independently without a
/// transaction. A failure between the two leaves them out of step until
/// the next sweep, which prunes index keys whose records are gone; `stats`
/// counts orphaned records by scanning the store directly.
#[derive(Debug)]
pub struct ContentCache<S, C = SystemClock> {
    store: S,
    clock: C,
    policy: ExpiryPolicy,
}

impl<S: KeyValueStore> ContentCache<S> {
    // == Constructor ==
    /// Creates a cache over `store` using the wall clock and default TTLs.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> ContentCache<S, C> {
    /// Creates a cache that reads "now" from `clock`.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            policy: ExpiryPolicy::default(),
        }
    }

    /// Replaces the expiry policy.
    pub fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn policy(&self) -> &ExpiryPolicy {
        &self.policy
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    // == Lookup ==
    /// Returns the live story cached for `fp`, if any.
    ///
    /// An expired story is deleted and reported as a miss.
    pub fn lookup_story(&mut self, fp: &Fingerprint) -> Option<CachedStoryEntry> {
        self.lookup(fp)
    }

    /// Returns the live image cached for `fp`, if any.
    pub fn lookup_image(&mut self, fp: &Fingerprint) -> Option<CachedImageEntry> {
        self.lookup(fp)
    }

    fn lookup<E: CachedEntry>(&mut self, fp: &Fingerprint) -> Option<E> {
        let key = fp.key();
        self.try_lookup(&key).unwrap_or_else(|e| {
            error!("Error getting cached {} '{}': {}", E::KIND.label(), key, e);
            None
        })
    }

    fn try_lookup<E: CachedEntry>(&mut self, key: &CacheKey) -> Result<Option<E>> {
        let Some(entry) = records::get::<E, _>(&self.store, key)? else {
            debug!("Cache miss for {} '{}'", E::KIND.label(), key);
            return Ok(None);
        };

        if self
            .policy
            .is_expired(E::KIND, entry.created_at(), self.clock.now())
        {
            records::delete::<E, _>(&mut self.store, key)?;
            index::unregister(&mut self.store, E::KIND, key)?;
            debug!("Cached {} '{}' expired, removed", E::KIND.label(), key);
            return Ok(None);
        }

        debug!("Cache hit for {} '{}'", E::KIND.label(), key);
        Ok(Some(entry))
    }

    // == Store ==
    /// Caches `story` under the key derived from `fp`, replacing any
    /// previous story for the same fingerprint.
    pub fn store_story(&mut self, fp: &Fingerprint, story: StoryDraft) {
        let key = fp.key();
        let entry = CachedStoryEntry::new(story, key.clone());
        self.write(&key, &entry);
    }

    /// Caches an image URL and its prompt, stamped with the current time.
    pub fn store_image(
        &mut self,
        fp: &Fingerprint,
        url: impl Into<String>,
        prompt: impl Into<String>,
    ) {
        let key = fp.key();
        let entry = CachedImageEntry {
            url: url.into(),
            prompt: prompt.into(),
            created_at: self.clock.now(),
            cache_key: key.clone(),
        };
        self.write(&key, &entry);
    }

    fn write<E: CachedEntry>(&mut self, key: &CacheKey, entry: &E) {
        match self.try_write(key, entry) {
            Ok(()) => debug!("Cached {} '{}'", E::KIND.label(), key),
            Err(e) => error!("Error caching {} '{}': {}", E::KIND.label(), key, e),
        }
    }

    fn try_write<E: CachedEntry>(&mut self, key: &CacheKey, entry: &E) -> Result<()> {
        records::put(&mut self.store, key, entry)?;
        index::register(&mut self.store, E::KIND, key)?;
        Ok(())
    }

    // == Evict ==
    /// Drops both the story and the image cached for `fp`.
    ///
    /// Returns how many records were removed.
    pub fn evict(&mut self, fp: &Fingerprint) -> usize {
        let key = fp.key();
        match self.try_evict(&key) {
            Ok(removed) => {
                debug!("Evicted {} records for '{}'", removed, key);
                removed
            }
            Err(e) => {
                error!("Error evicting '{}': {}", key, e);
                0
            }
        }
    }

    fn try_evict(&mut self, key: &CacheKey) -> Result<usize> {
        Ok(self.evict_kind::<CachedStoryEntry>(key)? + self.evict_kind::<CachedImageEntry>(key)?)
    }

    fn evict_kind<E: CachedEntry>(&mut self, key: &CacheKey) -> Result<usize> {
        let existed = self.store.get(&E::KIND.record_key(key))?.is_some();
        records::delete::<E, _>(&mut self.store, key)?;
        index::unregister(&mut self.store, E::KIND, key)?;
        Ok(usize::from(existed))
    }

    // == Clear All ==
    /// Deletes every indexed record of both kinds and empties both lists.
    ///
    /// Returns the number of index keys cleared; a second call returns 0.
    pub fn clear_all(&mut self) -> usize {
        match self.try_clear_all() {
            Ok(cleared) => {
                info!("All cache cleared ({} entries)", cleared);
                cleared
            }
            Err(e) => {
                error!("Error clearing cache: {}", e);
                0
            }
        }
    }

    fn try_clear_all(&mut self) -> Result<usize> {
        Ok(self.clear_kind::<CachedStoryEntry>()? + self.clear_kind::<CachedImageEntry>()?)
    }

    fn clear_kind<E: CachedEntry>(&mut self) -> Result<usize> {
        let keys = index::all(&self.store, E::KIND)?;
        for key in &keys {
            records::delete::<E, _>(&mut self.store, key)?;
        }
        index::clear(&mut self.store, E::KIND)?;
        Ok(keys.len())
    }

    // == Clear Expired ==
    /// Sweeps both index lists, removing expired and unreadable records.
    ///
    /// Index keys whose record is already gone are pruned without being
    /// counted. Returns the number of records removed.
    pub fn clear_expired(&mut self) -> usize {
        match self.try_clear_expired() {
            Ok(removed) => {
                info!("Expired cache sweep removed {} entries", removed);
                removed
            }
            Err(e) => {
                error!("Error clearing expired cache: {}", e);
                0
            }
        }
    }

    fn try_clear_expired(&mut self) -> Result<usize> {
        Ok(self.sweep::<CachedStoryEntry>()? + self.sweep::<CachedImageEntry>()?)
    }

    fn sweep<E: CachedEntry>(&mut self) -> Result<usize> {
        let keys = index::all(&self.store, E::KIND)?;
        if keys.is_empty() {
            return Ok(0);
        }

        let now = self.clock.now();
        let mut survivors = Vec::with_capacity(keys.len());
        let mut removed = 0;

        for key in keys {
            match records::read::<E, _>(&self.store, &key)? {
                Record::Present(entry) => {
                    if self.policy.is_expired(E::KIND, entry.created_at(), now) {
                        records::delete::<E, _>(&mut self.store, &key)?;
                        removed += 1;
                    } else {
                        survivors.push(key);
                    }
                }
                Record::Absent => {
                    warn!("Pruning dangling {} index key '{}'", E::KIND.label(), key);
                }
                Record::Corrupt(e) => {
                    warn!("Removing unreadable {} record: {}", E::KIND.label(), e);
                    records::delete::<E, _>(&mut self.store, &key)?;
                    removed += 1;
                }
            }
        }

        index::replace(&mut self.store, E::KIND, &survivors)?;
        Ok(removed)
    }

    // == Stats ==
    /// Counts, footprint and age range of the cache.
    ///
    /// Returns [`CacheStats::error`] if the store cannot be scanned.
    pub fn stats(&self) -> CacheStats {
        self.try_stats().unwrap_or_else(|e| {
            error!("Error getting cache stats: {}", e);
            CacheStats::error()
        })
    }

    fn try_stats(&self) -> Result<CacheStats> {
        let total_stories = index::all(&self.store, ContentKind::Story)?.len();
        let total_images = index::all(&self.store, ContentKind::Image)?.len();

        let mut acc = ScanAccumulator::default();
        for storage_key in self.store.keys()? {
            let cached = ContentKind::ALL
                .iter()
                .any(|kind| storage_key.starts_with(kind.record_prefix()));
            if !cached {
                continue;
            }
            if let Some(raw) = self.store.get(&storage_key)? {
                acc.observe(&raw);
            }
        }

        Ok(acc.finish(total_stories, total_images))
    }
}
