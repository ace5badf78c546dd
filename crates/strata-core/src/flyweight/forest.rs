//! Tree types and the process-wide tree-type pool.

use super::{Draw, Flyweight, FlyweightPool};
use crate::Point;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Built-in species used when planting forests: `(name, color, texture)`.
pub const SPECIES: &[(&str, &str, &str)] = &[
    ("oak", "green", "rough"),
    ("birch", "white", "smooth"),
    ("maple", "red", "smooth"),
    ("pine", "dark-green", "needled"),
];

/// Intrinsic attributes identifying a tree type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TreeKey {
    /// Species name.
    pub name: String,
    /// Foliage color.
    pub color: String,
    /// Bark texture.
    pub texture: String,
}

impl TreeKey {
    /// Create a key from its three attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, color: impl Into<String>, texture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            texture: texture.into(),
        }
    }
}

/// Shared state of every tree of one type. Immutable once built.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeType {
    name: String,
    color: String,
    texture: String,
}

impl TreeType {
    /// Species name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Foliage color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Bark texture.
    #[must_use]
    pub fn texture(&self) -> &str {
        &self.texture
    }
}

impl From<&TreeKey> for TreeType {
    fn from(key: &TreeKey) -> Self {
        Self {
            name: key.name.clone(),
            color: key.color.clone(),
            texture: key.texture.clone(),
        }
    }
}

impl Draw for TreeType {
    fn draw(&self, at: Point) -> String {
        format!(
            "{} {} {} tree at ({}, {})",
            self.color, self.texture, self.name, at.x, at.y
        )
    }
}

/// A tree: a shared tree type placed at its own coordinates.
pub type Tree = Flyweight<TreeType>;

static TREE_TYPES: Lazy<FlyweightPool<TreeKey, TreeType>> = Lazy::new(FlyweightPool::new);

/// The process-wide tree-type pool, created on first use.
pub fn tree_types() -> &'static FlyweightPool<TreeKey, TreeType> {
    &TREE_TYPES
}

/// Plant a tree of type `key` at `(x, y)`, sharing the type through `pool`.
pub fn plant(pool: &FlyweightPool<TreeKey, TreeType>, key: &TreeKey, x: i64, y: i64) -> Tree {
    Flyweight::new(pool.get_or_create(key), Point::new(x, y))
}
