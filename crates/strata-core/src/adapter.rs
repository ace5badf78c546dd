//! # Adapter
//!
//! Square pegs made usable where round pegs are expected.
//!
//! `RoundHole::fits` accepts any `Peg`. A `SquarePeg` has no radius, so
//! `SquarePegAdapter` wraps one and reports the circle through its corners.
//!
//! All comparisons use squared diameters, which stay exact in integers: a
//! square of width `w` has diagonal² `2·w²`, a circle of radius `r` has
//! diameter² `4·r²`.

/// Something that can be tested against a round hole.
pub trait Peg {
    /// Square of the smallest enclosing circle's diameter.
    fn diameter_squared(&self) -> u128;
}

/// A round hole of a given radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundHole {
    radius: u32,
}

impl RoundHole {
    /// Create a hole of radius `radius`.
    #[must_use]
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// The hole's radius.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Check whether `peg` passes through the hole.
    pub fn fits(&self, peg: &impl Peg) -> bool {
        let diameter = 2 * u128::from(self.radius);
        peg.diameter_squared() <= diameter * diameter
    }
}

/// A round peg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPeg {
    radius: u32,
}

impl RoundPeg {
    /// Create a peg of radius `radius`.
    #[must_use]
    pub const fn new(radius: u32) -> Self {
        Self { radius }
    }

    /// The peg's radius.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }
}

impl Peg for RoundPeg {
    fn diameter_squared(&self) -> u128 {
        let diameter = 2 * u128::from(self.radius);
        diameter * diameter
    }
}

/// A square peg. It does not implement `Peg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePeg {
    width: u32,
}

impl SquarePeg {
    /// Create a peg of side `width`.
    #[must_use]
    pub const fn new(width: u32) -> Self {
        Self { width }
    }

    /// The peg's side length.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }
}

/// Presents a `SquarePeg` as a `Peg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquarePegAdapter {
    peg: SquarePeg,
}

impl SquarePegAdapter {
    /// Wrap `peg`.
    #[must_use]
    pub const fn new(peg: SquarePeg) -> Self {
        Self { peg }
    }

    /// The wrapped peg.
    #[must_use]
    pub const fn peg(&self) -> &SquarePeg {
        &self.peg
    }
}

impl Peg for SquarePegAdapter {
    fn diameter_squared(&self) -> u128 {
        let width = u128::from(self.peg.width());
        2 * width * width
    }
}
