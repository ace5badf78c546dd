//! # Core Type Definitions
//!
//! This module contains the value types shared by every part of the core:
//! - Positions (`Point`)
//! - Render output (`Render`)
//! - Error types (`StrataError`)
//!
//! ## Integer Geometry
//!
//! Coordinates are integers and all arithmetic saturates, so moving a node
//! never panics on overflow.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// POINT
// =============================================================================

/// A position in the plane.
///
/// Leaves own a `Point`; flyweight handles keep one as extrinsic state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: i64,
    /// Vertical coordinate.
    pub y: i64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Return this point moved by `(dx, dy)` using saturating arithmetic.
    #[must_use]
    pub const fn translated(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

// =============================================================================
// RENDER
// =============================================================================

/// The output of `Component::render`.
///
/// A render is an ordered list of lines. Aggregating renders is plain
/// concatenation, so the order of lines mirrors the order of traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Render {
    lines: Vec<String>,
}

impl Render {
    /// Create an empty render.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a render holding a single line.
    #[must_use]
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
        }
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append every line of `other`, keeping its order.
    pub fn append(&mut self, other: Self) {
        self.lines.extend(other.lines);
    }

    /// The rendered lines in emission order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume the render, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether nothing was rendered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Render {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Strata system.
///
/// - No silent failures
/// - Use `Result<T, StrataError>` for fallible operations
/// - The core never panics; all errors surface to the immediate caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrataError {
    /// An aggregate-only operation was invoked on a node that cannot hold children.
    #[error("Operation '{operation}' is not supported by {kind}")]
    OperationNotSupported {
        /// The operation that was attempted.
        operation: &'static str,
        /// The kind of node it was attempted on.
        kind: &'static str,
    },

    /// The component to remove is not a direct child.
    #[error("Component not found among direct children")]
    NotFound,

    /// A proxied target operation failed.
    #[error("Delegation failed: {0}")]
    DelegationFailure(String),

    /// Adding the child would make a composite contain itself.
    #[error("Cycle detected: a composite cannot contain itself")]
    CycleDetected,

    /// A component failed to produce its output.
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// A scene description could not be turned into components.
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
