//! # Proxy Module
//!
//! Memoizing delegation to a costly collaborator.
//!
//! `CacheProxy` is the shared mechanism: one cache slot per request identity,
//! populated by at most one delegated call between invalidations. Two proxies
//! are built on it:
//! - `RenderProxy`: a `Component` caching its target's render output
//! - `VideoProxy`: a `VideoService` caching list/info/download responses
//!
//! ## Concurrency
//!
//! Looking up a slot takes a read lock on the slot map; only a missing slot
//! takes the write lock. Populating a slot is serialized per slot, so
//! concurrent requests for the same key delegate once while other keys proceed.
//! A failed delegation leaves the slot empty, and the slot is dropped from the
//! map when no other caller is waiting on it.
//!
//! `invalidate` replaces the slot map under the write lock. A request that was
//! already in flight finishes into a slot that is no longer reachable, so its
//! value is never observed after the invalidation.

mod video;

pub use video::{
    Request, ThirdPartyVideoService, VideoId, VideoManager, VideoProxy, VideoService,
};

use crate::component::{Component, ComponentRef};
use crate::{Render, StrataError};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// INVALIDATE TRAIT
// =============================================================================

/// Something holding cached results that can be reset.
pub trait Invalidate {
    /// Return every cache slot to empty. Never contacts the target.
    fn invalidate(&self);
}

// =============================================================================
// CACHE PROXY
// =============================================================================

/// Per-identity memo in front of a delegated call.
pub struct CacheProxy<K, V> {
    slots: RwLock<HashMap<K, Arc<OnceCell<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> Default for CacheProxy<K, V> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl<K, V> fmt::Debug for CacheProxy<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheProxy")
            .field("slots", &self.slots.read().len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}

impl<K, V> CacheProxy<K, V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests answered from the cache.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of requests that were delegated to the target.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of populated slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Check whether no slot is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> CacheProxy<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Return the cached value for `key`, delegating on a miss.
    ///
    /// Errors from `delegate` are returned unchanged and are not cached.
    pub fn fetch<E>(&self, key: &K, delegate: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let slot = self.slot(key);
        if let Some(value) = slot.get() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(?key, "cache hit");
            return Ok(value.clone());
        }

        let mut delegated = false;
        let result = slot.get_or_try_init(|| {
            delegated = true;
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(?key, "cache miss, delegating");
            delegate()
        });

        match result {
            Ok(value) => {
                if !delegated {
                    // Another caller populated the slot while we waited.
                    self.hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(value.clone())
            }
            Err(e) => {
                tracing::debug!(?key, "delegation failed, slot left empty");
                self.discard_empty(key, &slot);
                Err(e)
            }
        }
    }

    /// Check whether `key` has a populated slot.
    #[must_use]
    pub fn is_cached(&self, key: &K) -> bool {
        self.slots
            .read()
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Drop the map entry for `key` if it is still `slot`, still empty, and
    /// no other caller holds it.
    fn discard_empty(&self, key: &K, slot: &Arc<OnceCell<V>>) {
        let mut slots = self.slots.write();
        let unused = slots.get(key).is_some_and(|current| {
            Arc::ptr_eq(current, slot) && current.get().is_none() && Arc::strong_count(slot) == 2
        });
        if unused {
            slots.remove(key);
        }
    }

    fn slot(&self, key: &K) -> Arc<OnceCell<V>> {
        if let Some(slot) = self.slots.read().get(key) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}

impl<K, V> Invalidate for CacheProxy<K, V> {
    fn invalidate(&self) {
        let dropped = std::mem::take(&mut *self.slots.write());
        tracing::debug!(slots = dropped.len(), "cache invalidated");
    }
}

// =============================================================================
// RENDER PROXY
// =============================================================================

/// A component that caches its target's render output.
///
/// Moving the proxy moves the target and invalidates the cache. Changes made
/// to the target through another handle are not seen until `invalidate`.
#[derive(Debug)]
pub struct RenderProxy {
    target: ComponentRef,
    cache: CacheProxy<(), Render>,
}

impl RenderProxy {
    /// Front `target` with a render cache.
    #[must_use]
    pub fn new(target: ComponentRef) -> Self {
        Self {
            target,
            cache: CacheProxy::new(),
        }
    }

    /// The proxied component.
    #[must_use]
    pub fn target(&self) -> &ComponentRef {
        &self.target
    }

    /// The underlying cache, for inspection.
    #[must_use]
    pub fn cache(&self) -> &CacheProxy<(), Render> {
        &self.cache
    }
}

impl Invalidate for RenderProxy {
    fn invalidate(&self) {
        self.cache.invalidate();
    }
}

impl Component for RenderProxy {
    fn kind(&self) -> &'static str {
        "proxy"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        self.target.apply_transform(dx, dy);
        self.cache.invalidate();
    }

    fn render(&self) -> Result<Render, StrataError> {
        self.cache.fetch(&(), || self.target.render())
    }

    fn children(&self) -> &[ComponentRef] {
        std::slice::from_ref(&self.target)
    }
}

// =============================================================================
// TESTS
// =============================================================================
