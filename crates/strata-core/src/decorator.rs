//! # Decorator Chain
//!
//! Behavior layered around a single wrapped component.
//!
//! A `Decorator` runs its layer's pre-step, renders the wrapped component, then
//! runs the post-step. Because a decorator is itself a component, chains nest:
//! `Encryption(Compression(leaf))` executes
//!
//! ```text
//! encryption pre → compression pre → leaf → compression post → encryption post
//! ```
//!
//! The post-step only runs when the wrapped render succeeded.

use crate::component::{Component, ComponentRef};
use crate::{Render, StrataError};
use std::fmt;

// =============================================================================
// LAYER TRAIT
// =============================================================================

/// The behavior a decorator adds.
///
/// A layer sees only the rendered output of what it wraps, never the wrapped
/// component itself, so layers stack in any order and depth.
pub trait Layer: fmt::Debug + Send + Sync {
    /// Name used in logs.
    fn name(&self) -> String;

    /// Runs before the wrapped component renders.
    fn before(&self, out: &mut Render);

    /// Reshape the wrapped output before it is placed between the two steps.
    ///
    /// The decorator always places the returned lines; the default keeps them
    /// unchanged.
    fn map_inner(&self, inner: Render) -> Render {
        inner
    }

    /// Runs after the wrapped output has been placed.
    fn after(&self, out: &mut Render);
}

/// Marks the wrapped output as encrypted on the way in and decrypted on the way out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encryption;

impl Layer for Encryption {
    fn name(&self) -> String {
        "encryption".to_string()
    }

    fn before(&self, out: &mut Render) {
        out.push("encrypt");
    }

    fn after(&self, out: &mut Render) {
        out.push("decrypt");
    }
}

/// Marks the wrapped output as compressed on the way in and decompressed on the way out.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compression;

impl Layer for Compression {
    fn name(&self) -> String {
        "compression".to_string()
    }

    fn before(&self, out: &mut Render) {
        out.push("compress");
    }

    fn after(&self, out: &mut Render) {
        out.push("decompress");
    }
}

/// Draws a colored outline around the wrapped output, indenting it one level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    color: String,
}

impl Outline {
    /// Create an outline of the given color.
    #[must_use]
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

impl Layer for Outline {
    fn name(&self) -> String {
        format!("outline({})", self.color)
    }

    fn before(&self, out: &mut Render) {
        out.push(format!("begin {} outline", self.color));
    }

    fn map_inner(&self, inner: Render) -> Render {
        let mut indented = Render::new();
        for line in inner.into_lines() {
            indented.push(format!("  {line}"));
        }
        indented
    }

    fn after(&self, out: &mut Render) {
        out.push(format!("end {} outline", self.color));
    }
}

// =============================================================================
// DECORATOR
// =============================================================================

/// A component wrapping exactly one other component with a layer.
#[derive(Debug)]
pub struct Decorator {
    layer: Box<dyn Layer>,
    wrapped: ComponentRef,
}

impl Decorator {
    /// Wrap `wrapped` with `layer`.
    pub fn new(layer: impl Layer + 'static, wrapped: ComponentRef) -> Self {
        Self {
            layer: Box::new(layer),
            wrapped,
        }
    }

    /// Wrap `wrapped` with a boxed layer.
    #[must_use]
    pub fn with_boxed(layer: Box<dyn Layer>, wrapped: ComponentRef) -> Self {
        Self { layer, wrapped }
    }

    /// Wrap `wrapped` with `layer` and return the decorator's handle.
    pub fn wrap(layer: impl Layer + 'static, wrapped: ComponentRef) -> ComponentRef {
        ComponentRef::new(Self::new(layer, wrapped))
    }

    /// The wrapped component.
    #[must_use]
    pub fn wrapped(&self) -> &ComponentRef {
        &self.wrapped
    }
}

impl Component for Decorator {
    fn kind(&self) -> &'static str {
        "decorator"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        self.wrapped.apply_transform(dx, dy);
    }

    fn render(&self) -> Result<Render, StrataError> {
        let mut out = Render::new();
        self.layer.before(&mut out);
        let inner = self.wrapped.render().inspect_err(|e| {
            tracing::debug!(layer = %self.layer.name(), error = %e, "wrapped render failed, skipping post-step");
        })?;
        out.append(self.layer.map_inner(inner));
        self.layer.after(&mut out);
        Ok(out)
    }

    fn children(&self) -> &[ComponentRef] {
        std::slice::from_ref(&self.wrapped)
    }
}

// =============================================================================
// TESTS
// =============================================================================
