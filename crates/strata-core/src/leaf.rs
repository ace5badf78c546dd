//! # Leaves
//!
//! Terminal components that own their primitive state and have no children.

use crate::component::Component;
use crate::{Point, Render, StrataError};

/// A single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    position: Point,
}

impl Dot {
    /// Create a dot at `(x, y)`.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self {
            position: Point::new(x, y),
        }
    }
}

impl Component for Dot {
    fn kind(&self) -> &'static str {
        "dot"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        self.position = self.position.translated(dx, dy);
    }

    fn render(&self) -> Result<Render, StrataError> {
        Ok(Render::line(format!(
            "dot at ({}, {})",
            self.position.x, self.position.y
        )))
    }

    fn position(&self) -> Option<Point> {
        Some(self.position)
    }
}

/// A circle: a dot with a radius.
///
/// Transforms move the center; the radius is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    center: Dot,
    radius: u32,
}

impl Circle {
    /// Create a circle centered at `(x, y)`.
    #[must_use]
    pub const fn new(x: i64, y: i64, radius: u32) -> Self {
        Self {
            center: Dot::new(x, y),
            radius,
        }
    }

    /// The circle's radius.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }
}

impl Component for Circle {
    fn kind(&self) -> &'static str {
        "circle"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        self.center.apply_transform(dx, dy);
    }

    fn render(&self) -> Result<Render, StrataError> {
        let p = self.center.position;
        Ok(Render::line(format!(
            "circle at ({}, {}) radius {}",
            p.x, p.y, self.radius
        )))
    }

    fn position(&self) -> Option<Point> {
        Some(self.center.position)
    }
}
