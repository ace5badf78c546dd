//! # Flyweight Module
//!
//! Deduplicated, immutable shared state.
//!
//! - `FlyweightPool`: lookup-or-insert registry keyed on intrinsic state
//! - `Flyweight`: a handle pairing shared state with its own extrinsic position
//! - `forest`: tree types, the process-wide tree-type pool and trees
//!
//! ## Identity Law
//!
//! For equal keys the pool returns the same `Arc` (`Arc::ptr_eq` holds); for
//! unequal keys it returns distinct objects. The pool only grows.

mod forest;

pub use forest::{SPECIES, Tree, TreeKey, TreeType, plant, tree_types};

use crate::component::Component;
use crate::{Point, Render, StrataError};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

// =============================================================================
// POOL
// =============================================================================

/// Registry of shared state objects keyed by their intrinsic attributes.
///
/// Safe for concurrent use: lookups of present keys share a read lock, and
/// inserting a new key re-checks under the write lock, so two callers racing
/// on the same new key get the same object.
pub struct FlyweightPool<K, T> {
    entries: RwLock<HashMap<K, Arc<T>>>,
}

impl<K, T> Default for FlyweightPool<K, T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, T> fmt::Debug for FlyweightPool<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlyweightPool")
            .field("entries", &self.len())
            .finish()
    }
}

impl<K, T> FlyweightPool<K, T> {
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of shared objects in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<K, T> FlyweightPool<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
{
    /// Return the shared object for `key`, constructing it with `make` if absent.
    ///
    /// `make` runs at most once per key over the pool's lifetime.
    pub fn get_or_create_with(&self, key: &K, make: impl FnOnce(&K) -> T) -> Arc<T> {
        if let Some(shared) = self.entries.read().get(key) {
            return Arc::clone(shared);
        }

        let mut entries = self.entries.write();
        let shared = entries.entry(key.clone()).or_insert_with(|| {
            tracing::debug!(?key, "flyweight created");
            Arc::new(make(key))
        });
        Arc::clone(shared)
    }

    /// Check whether `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl<K, T> FlyweightPool<K, T>
where
    K: Eq + Hash + Clone + fmt::Debug,
    T: for<'a> From<&'a K>,
{
    /// Return the shared object for `key`, building it from the key if absent.
    pub fn get_or_create(&self, key: &K) -> Arc<T> {
        self.get_or_create_with(key, |k| T::from(k))
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Shared state that can draw itself at a caller-supplied position.
pub trait Draw: fmt::Debug + Send + Sync {
    /// Describe this state drawn at `at`.
    fn draw(&self, at: Point) -> String;
}

/// A lightweight context object: shared state plus its own position.
///
/// The position is extrinsic state and never reaches the shared object.
#[derive(Debug)]
pub struct Flyweight<S> {
    shared: Arc<S>,
    position: Point,
}

impl<S> Clone for Flyweight<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            position: self.position,
        }
    }
}

impl<S> Flyweight<S> {
    /// Place `shared` at `position`.
    #[must_use]
    pub fn new(shared: Arc<S>, position: Point) -> Self {
        Self { shared, position }
    }

    /// The shared state (read-only).
    #[must_use]
    pub fn shared(&self) -> &S {
        &self.shared
    }

    /// Check whether both handles use the same shared object.
    #[must_use]
    pub fn shares_state_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<S: Draw> Component for Flyweight<S> {
    fn kind(&self) -> &'static str {
        "flyweight"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        self.position = self.position.translated(dx, dy);
    }

    fn render(&self) -> Result<Render, StrataError> {
        Ok(Render::line(self.shared.draw(self.position)))
    }

    fn position(&self) -> Option<Point> {
        Some(self.position)
    }
}

// =============================================================================
// TESTS
// =============================================================================
