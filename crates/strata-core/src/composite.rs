//! # Composite
//!
//! Ordered aggregation of components into a tree.
//!
//! - Children keep insertion order through `add`, `remove` and traversal
//! - `render` is depth-first pre-order; a composite contributes no lines itself
//! - `add` rejects any child that would make the composite contain itself
//!
//! Sharing a node between parents is allowed. Such a node receives a
//! transform once per path that reaches it.

use crate::component::{Component, ComponentRef};
use crate::{Render, StrataError};

/// A component that aggregates an ordered sequence of children.
#[derive(Debug, Default)]
pub struct Composite {
    children: Vec<ComponentRef>,
}

impl Composite {
    /// Create an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a composite holding `children` in the given order.
    ///
    /// The children are fresh handles, so no cycle check is needed.
    #[must_use]
    pub fn with_children(children: Vec<ComponentRef>) -> Self {
        Self { children }
    }

    /// Append a child.
    ///
    /// Returns `CycleDetected` if `child` is this composite or contains it
    /// anywhere below. The walk locks nodes of `child`'s subtree for reading,
    /// so the caller must not hold write locks inside that subtree.
    pub fn add(&mut self, child: ComponentRef) -> Result<(), StrataError> {
        let this = std::ptr::from_ref::<Self>(self).cast::<()>();
        if child.reaches(this) {
            tracing::debug!(children = self.children.len(), "rejected cyclic add");
            return Err(StrataError::CycleDetected);
        }
        self.children.push(child);
        Ok(())
    }

    /// Remove the first direct child that is the same node as `child`.
    ///
    /// Removal is not recursive: grandchildren are never matched.
    pub fn remove(&mut self, child: &ComponentRef) -> Result<ComponentRef, StrataError> {
        let index = self
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
            .ok_or(StrataError::NotFound)?;
        Ok(self.children.remove(index))
    }

    /// Check whether `child` is a direct child.
    #[must_use]
    pub fn contains(&self, child: &ComponentRef) -> bool {
        self.children.iter().any(|c| c.ptr_eq(child))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check whether the composite has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Component for Composite {
    fn kind(&self) -> &'static str {
        "composite"
    }

    fn apply_transform(&mut self, dx: i64, dy: i64) {
        for child in &self.children {
            child.apply_transform(dx, dy);
        }
    }

    fn render(&self) -> Result<Render, StrataError> {
        let mut out = Render::new();
        for child in &self.children {
            out.append(child.render()?);
        }
        Ok(out)
    }

    fn children(&self) -> &[ComponentRef] {
        &self.children
    }

    fn as_composite(&self) -> Option<&Composite> {
        Some(self)
    }

    fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        Some(self)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::attach;
    use crate::leaf::{Circle, Dot};

    fn dot(x: i64, y: i64) -> ComponentRef {
        ComponentRef::new(Dot::new(x, y))
    }

    #[test]
    fn render_follows_insertion_order() {
        let mut group = Composite::new();
        group.add(dot(3, 0)).expect("add");
        group.add(dot(1, 0)).expect("add");
        group.add(ComponentRef::new(Circle::new(2, 0, 5))).expect("add");

        let render = group.render().expect("render");
        assert_eq!(
            render.lines(),
            ["dot at (3, 0)", "dot at (1, 0)", "circle at (2, 0) radius 5"]
        );
    }

    #[test]
    fn empty_composite_renders_nothing() {
        let group = Composite::new();
        assert!(group.render().expect("render").is_empty());
        assert!(group.is_empty());
    }

    #[test]
    fn remove_keeps_relative_order() {
        let a = dot(1, 1);
        let b = dot(2, 2);
        let c = dot(3, 3);
        let mut group = Composite::with_children(vec![a.clone(), b.clone(), c.clone()]);

        group.remove(&b).expect("remove");

        assert_eq!(group.len(), 2);
        assert!(group.contains(&a));
        assert!(!group.contains(&b));
        assert_eq!(
            group.render().expect("render").lines(),
            ["dot at (1, 1)", "dot at (3, 3)"]
        );
    }

    #[test]
    fn remove_matches_identity_not_value() {
        let a = dot(1, 1);
        let twin = dot(1, 1);
        let mut group = Composite::with_children(vec![a]);

        assert_eq!(group.remove(&twin).expect_err("twin"), StrataError::NotFound);
    }

    #[test]
    fn remove_takes_first_occurrence() {
        let shared = dot(0, 0);
        let other = dot(9, 9);
        let mut group =
            Composite::with_children(vec![shared.clone(), other.clone(), shared.clone()]);

        group.remove(&shared).expect("remove");

        assert!(group.children()[0].ptr_eq(&other));
        assert!(group.children()[1].ptr_eq(&shared));
    }

    #[test]
    fn remove_is_not_recursive() {
        let inner_dot = dot(5, 9);
        let inner = ComponentRef::new(Composite::with_children(vec![inner_dot.clone()]));
        let mut outer = Composite::with_children(vec![inner]);

        assert_eq!(
            outer.remove(&inner_dot).expect_err("grandchild"),
            StrataError::NotFound
        );
    }

    #[test]
    fn transform_reaches_every_descendant() {
        let near = dot(1, 2);
        let far = dot(5, 9);
        let sub = ComponentRef::new(Composite::with_children(vec![far.clone()]));
        let mut root = Composite::with_children(vec![near.clone(), sub]);

        root.apply_transform(2, 2);

        assert_eq!(near.position(), Some(crate::Point::new(3, 4)));
        assert_eq!(far.position(), Some(crate::Point::new(7, 11)));
    }

    #[test]
    fn adding_self_is_a_cycle() {
        let group = ComponentRef::new(Composite::new());
        let err = attach(&group, group.clone()).expect_err("self add");
        assert_eq!(err, StrataError::CycleDetected);
    }

    #[test]
    fn adding_an_ancestor_is_a_cycle() {
        let parent = ComponentRef::new(Composite::new());
        let child = ComponentRef::new(Composite::new());
        attach(&parent, child.clone()).expect("attach");

        let err = attach(&child, parent.clone()).expect_err("ancestor add");
        assert_eq!(err, StrataError::CycleDetected);
        assert_eq!(child.node_count(), 1);
    }

    #[test]
    fn sharing_a_leaf_is_not_a_cycle() {
        let shared = dot(0, 0);
        let mut group = Composite::new();
        group.add(shared.clone()).expect("first");
        group.add(shared).expect("second");
        assert_eq!(group.len(), 2);
    }
}
