//! # Component Contract
//!
//! The capability interface every node in a structure satisfies.
//!
//! Leaves, composites, decorators and proxies are all `Component`s, and all of
//! them are held through the same shared handle, `ComponentRef`. Calls flow
//! downward through the handles until a leaf does the work.

use crate::composite::Composite;
use crate::{Point, Render, StrataError};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// COMPONENT TRAIT
// =============================================================================

/// The Component trait defines the operations every node supports.
///
/// `apply_transform` and `render` are required: there is no placeholder
/// implementation that fails at runtime. The remaining methods describe the
/// node's structure and have non-failing defaults that leaves keep.
pub trait Component: fmt::Debug + Send + Sync {
    /// Short label for the node variant ("dot", "composite", ...).
    fn kind(&self) -> &'static str;

    /// Move the node (and everything below it) by `(dx, dy)`.
    fn apply_transform(&mut self, dx: i64, dy: i64);

    /// Produce this node's output.
    fn render(&self) -> Result<Render, StrataError>;

    /// Structural children, in order.
    ///
    /// A composite returns its children; a decorator or proxy returns the one
    /// component it wraps; a leaf returns nothing.
    fn children(&self) -> &[ComponentRef] {
        &[]
    }

    /// The node's own position, if it has one.
    fn position(&self) -> Option<Point> {
        None
    }

    /// Downcast to a composite.
    fn as_composite(&self) -> Option<&Composite> {
        None
    }

    /// Mutable downcast to a composite.
    fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        None
    }
}

// =============================================================================
// COMPONENT HANDLE
// =============================================================================

/// Shared handle to a component.
///
/// Cloning the handle shares the node; it does not copy it. Two handles are
/// the same node when `ptr_eq` holds, which is the identity used by
/// `Composite::remove` and by cycle detection.
#[derive(Debug, Clone)]
pub struct ComponentRef(Arc<RwLock<dyn Component>>);

impl ComponentRef {
    /// Wrap a component in a new handle.
    pub fn new<C: Component + 'static>(component: C) -> Self {
        let inner: Arc<RwLock<dyn Component>> = Arc::new(RwLock::new(component));
        Self(inner)
    }

    /// Lock the node for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, dyn Component> {
        self.0.read()
    }

    /// Lock the node for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, dyn Component> {
        self.0.write()
    }

    /// Check whether both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// Address of the node itself, without taking the lock.
    pub(crate) fn addr(&self) -> *const () {
        self.0.data_ptr().cast_const().cast::<()>()
    }

    /// Render the node.
    pub fn render(&self) -> Result<Render, StrataError> {
        self.read().render()
    }

    /// Move the node by `(dx, dy)`.
    pub fn apply_transform(&self, dx: i64, dy: i64) {
        self.write().apply_transform(dx, dy);
    }

    /// The node's own position, if it has one.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        self.read().position()
    }

    /// The node's variant label.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.read().kind()
    }

    /// Count the distinct nodes reachable from this one, itself included.
    ///
    /// A node shared at several places is counted once.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut visited = HashSet::new();
        self.collect_nodes(&mut visited);
        visited.len()
    }

    fn collect_nodes(&self, visited: &mut HashSet<*const ()>) {
        if !visited.insert(self.addr()) {
            return;
        }
        let guard = self.read();
        for child in guard.children() {
            child.collect_nodes(visited);
        }
    }

    /// Check whether `target` is this node or appears anywhere below it.
    ///
    /// `target` is compared by address and is never locked, so a caller may
    /// hold `target`'s write lock while asking. Each distinct node is visited
    /// once, so shared subtrees cost no more than their size.
    pub(crate) fn reaches(&self, target: *const ()) -> bool {
        let mut visited = HashSet::new();
        self.reaches_from(target, &mut visited)
    }

    fn reaches_from(&self, target: *const (), visited: &mut HashSet<*const ()>) -> bool {
        let addr = self.addr();
        if addr == target {
            return true;
        }
        if !visited.insert(addr) {
            return false;
        }
        let guard = self.read();
        guard
            .children()
            .iter()
            .any(|child| child.reaches_from(target, visited))
    }
}

// =============================================================================
// UNIFORM CHILD MANAGEMENT
// =============================================================================

/// Add `child` to `parent` through the uniform component interface.
///
/// Fails with `OperationNotSupported` when `parent` is not a composite.
pub fn attach(parent: &ComponentRef, child: ComponentRef) -> Result<(), StrataError> {
    let mut guard = parent.write();
    let kind = guard.kind();
    match guard.as_composite_mut() {
        Some(composite) => composite.add(child),
        None => Err(StrataError::OperationNotSupported {
            operation: "add",
            kind,
        }),
    }
}

/// Remove `child` from `parent` through the uniform component interface.
///
/// Fails with `OperationNotSupported` when `parent` is not a composite and with
/// `NotFound` when `child` is not one of its direct children.
pub fn detach(parent: &ComponentRef, child: &ComponentRef) -> Result<ComponentRef, StrataError> {
    let mut guard = parent.write();
    let kind = guard.kind();
    match guard.as_composite_mut() {
        Some(composite) => composite.remove(child),
        None => Err(StrataError::OperationNotSupported {
            operation: "remove",
            kind,
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaf::Dot;

    #[test]
    fn clones_share_the_node() {
        let a = ComponentRef::new(Dot::new(1, 1));
        let b = a.clone();
        let c = ComponentRef::new(Dot::new(1, 1));

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));

        b.apply_transform(1, 0);
        assert_eq!(a.position(), Some(Point::new(2, 1)));
    }

    #[test]
    fn attach_to_leaf_is_not_supported() {
        let leaf = ComponentRef::new(Dot::new(0, 0));
        let child = ComponentRef::new(Dot::new(1, 1));

        let err = attach(&leaf, child).expect_err("leaf cannot hold children");
        assert_eq!(
            err,
            StrataError::OperationNotSupported {
                operation: "add",
                kind: "dot",
            }
        );
    }

    #[test]
    fn detach_from_leaf_is_not_supported() {
        let leaf = ComponentRef::new(Dot::new(0, 0));
        let other = ComponentRef::new(Dot::new(1, 1));

        let err = detach(&leaf, &other).expect_err("leaf has no children");
        assert!(matches!(
            err,
            StrataError::OperationNotSupported {
                operation: "remove",
                ..
            }
        ));
    }

    #[test]
    fn attach_and_detach_through_handles() {
        let root = ComponentRef::new(Composite::new());
        let dot = ComponentRef::new(Dot::new(3, 4));

        attach(&root, dot.clone()).expect("attach");
        assert_eq!(root.node_count(), 2);

        let removed = detach(&root, &dot).expect("detach");
        assert!(removed.ptr_eq(&dot));
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn shared_nodes_are_counted_once() {
        let dot = ComponentRef::new(Dot::new(0, 0));
        let pair = ComponentRef::new(Composite::with_children(vec![dot.clone(), dot]));
        let root = ComponentRef::new(Composite::with_children(vec![pair.clone(), pair]));

        assert_eq!(root.node_count(), 3);
    }
}
