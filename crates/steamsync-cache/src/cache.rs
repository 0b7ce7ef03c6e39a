//! The keyed store shared by both caches.
//!
//! # Concurrency note
//!
//! Unlike a store owned by one task, an `EntityCache` is read from any
//! number of application threads while the synchronizer writes to it.
//! Each cache has exactly one `RwLock`. Every method takes the lock once,
//! does one structural change or one copy, and releases it, so:
//!
//! - readers run in parallel with each other but never with a writer,
//! - a [`snapshot`](EntityCache::snapshot) is a single consistent
//!   instant,
//! - the closures passed to [`update`](EntityCache::update) and
//!   [`upsert_with`](EntityCache::upsert_with) run under the write lock,
//!   so they must not block or call back into the same cache.
//!
//! # Normalization
//!
//! Every method that takes an id normalizes it with
//! [`SteamId::to_canonical`] first. A clan's chat-room id and its clan id
//! therefore reach the same entry.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use steamsync_protocol::SteamId;

use crate::Entity;

/// A concurrent map from canonical [`SteamId`] to one record.
#[derive(Debug)]
pub struct EntityCache<E> {
    entries: RwLock<HashMap<SteamId, E>>,
}

impl<E: Entity> EntityCache<E> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts `entity`, replacing any record at its canonical id.
    ///
    /// The stored record's id is rewritten to the canonical form.
    pub fn upsert(&self, mut entity: E) {
        let key = entity.steam_id().to_canonical();
        entity.set_steam_id(key);
        self.write().insert(key, entity);
    }

    /// Applies `f` to the record at `id`, first creating a placeholder
    /// if there is none. Creation and update happen under one lock, so
    /// no reader sees the bare placeholder.
    ///
    /// Returns `true` if a placeholder was created.
    pub fn upsert_with(&self, id: SteamId, f: impl FnOnce(&mut E)) -> bool {
        let key = id.to_canonical();
        let mut entries = self.write();
        let mut created = false;
        let entry = entries.entry(key).or_insert_with(|| {
            created = true;
            E::placeholder(key)
        });
        f(entry);
        created
    }

    /// Deletes the record at `id`, returning it. No-op if absent.
    pub fn remove(&self, id: SteamId) -> Option<E> {
        let key = id.to_canonical();
        let removed = self.write().remove(&key);
        if removed.is_some() {
            tracing::debug!(steam_id = %key, "cache entry removed");
        }
        removed
    }

    /// Returns a copy of the record at `id`.
    pub fn get(&self, id: SteamId) -> Option<E> {
        self.read().get(&id.to_canonical()).cloned()
    }

    pub fn contains(&self, id: SteamId) -> bool {
        self.read().contains_key(&id.to_canonical())
    }

    /// Returns an independent copy of every record.
    ///
    /// The copy is deep: nested collections (such as a group's chat
    /// roster) are cloned too, so later writes never show through.
    pub fn snapshot(&self) -> HashMap<SteamId, E> {
        self.read().clone()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Applies `f` to the record at `id` in place.
    ///
    /// Returns `false` and does nothing if there is no record: field
    /// updates never create entries, only [`upsert`](Self::upsert) and
    /// [`upsert_with`](Self::upsert_with) do.
    pub fn update(&self, id: SteamId, f: impl FnOnce(&mut E)) -> bool {
        match self.write().get_mut(&id.to_canonical()) {
            Some(entry) => {
                f(entry);
                true
            }
            None => false,
        }
    }

    /// A handle that can read this cache but not change it.
    pub fn reader(&self) -> CacheReader<'_, E> {
        CacheReader { cache: self }
    }

    // Every critical section leaves the map structurally valid, so a
    // panic in another thread doesn't invalidate the data.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<SteamId, E>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SteamId, E>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<E: Entity> Default for EntityCache<E> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// CacheReader
// ---------------------------------------------------------------------------

/// Read-only view of an [`EntityCache`].
///
/// Handed to application code so that only the synchronizer creates or
/// destroys records.
#[derive(Debug)]
pub struct CacheReader<'a, E> {
    cache: &'a EntityCache<E>,
}

// Manual impls: deriving would require `E: Clone`/`E: Copy`.
impl<E> Clone for CacheReader<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for CacheReader<'_, E> {}

impl<E: Entity> CacheReader<'_, E> {
    pub fn get(&self, id: SteamId) -> Option<E> {
        self.cache.get(id)
    }

    pub fn contains(&self, id: SteamId) -> bool {
        self.cache.contains(id)
    }

    pub fn snapshot(&self) -> HashMap<SteamId, E> {
        self.cache.snapshot()
    }

    pub fn count(&self) -> usize {
        self.cache.count()
    }
}
