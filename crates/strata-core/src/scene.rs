//! # Scene Description
//!
//! A serde description of a component tree, so structures can be declared in
//! TOML or JSON and built into components.
//!
//! ```toml
//! transform = { dx = 2, dy = 2 }
//!
//! [root]
//! kind = "group"
//!
//! [[root.children]]
//! kind = "dot"
//! x = 1
//! y = 2
//!
//! [[root.children]]
//! kind = "decorated"
//! layers = ["encryption", { outline = "red" }]
//! inner = { kind = "circle", x = 4, y = 6, radius = 10 }
//! ```
//!
//! Parsing is left to the caller; this module only maps the parsed value onto
//! components and validates it.

use crate::component::ComponentRef;
use crate::composite::Composite;
use crate::decorator::{Compression, Decorator, Encryption, Layer, Outline};
use crate::flyweight::{FlyweightPool, TreeKey, TreeType, plant, tree_types};
use crate::leaf::{Circle, Dot};
use crate::primitives::{MAX_SCENE_DEPTH, MAX_SCENE_NODES};
use crate::proxy::RenderProxy;
use crate::StrataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// =============================================================================
// DESCRIPTION TYPES
// =============================================================================

/// A whole scene: a root node and an optional transform applied after building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSpec {
    /// The root of the tree.
    pub root: NodeSpec,
    /// Transform applied to the root once built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformSpec>,
}

/// A translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSpec {
    /// Horizontal offset.
    pub dx: i64,
    /// Vertical offset.
    pub dy: i64,
}

/// One node of a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    /// A `Dot` leaf.
    Dot { x: i64, y: i64 },
    /// A `Circle` leaf.
    Circle { x: i64, y: i64, radius: u32 },
    /// A `Composite` with children in order.
    Group {
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// A decorator chain; the first layer is the outermost.
    Decorated {
        layers: Vec<LayerSpec>,
        inner: Box<NodeSpec>,
    },
    /// A `RenderProxy` in front of `inner`.
    Cached { inner: Box<NodeSpec> },
    /// A flyweight tree whose type comes from the tree-type pool.
    Tree {
        name: String,
        color: String,
        texture: String,
        x: i64,
        y: i64,
    },
}

/// A decorator layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpec {
    /// `Encryption`.
    Encryption,
    /// `Compression`.
    Compression,
    /// `Outline` with a color.
    Outline(String),
}

impl LayerSpec {
    fn build(&self) -> Box<dyn Layer> {
        match self {
            Self::Encryption => Box::new(Encryption),
            Self::Compression => Box::new(Compression),
            Self::Outline(color) => Box::new(Outline::new(color.clone())),
        }
    }
}

/// Summary of a scene description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneStats {
    /// Total nodes, decorators and proxies included.
    pub nodes: usize,
    /// Flyweight trees.
    pub trees: usize,
    /// Distinct tree types among them.
    pub tree_types: usize,
}

// =============================================================================
// BUILDING
// =============================================================================

impl SceneSpec {
    /// The built-in demo: a group holding a dot, a circle and a nested group.
    #[must_use]
    pub fn demo() -> Self {
        Self {
            root: NodeSpec::Group {
                children: vec![
                    NodeSpec::Dot { x: 1, y: 2 },
                    NodeSpec::Circle {
                        x: 4,
                        y: 6,
                        radius: 10,
                    },
                    NodeSpec::Group {
                        children: vec![
                            NodeSpec::Dot { x: 5, y: 9 },
                            NodeSpec::Circle {
                                x: 3,
                                y: 8,
                                radius: 7,
                            },
                        ],
                    },
                ],
            },
            transform: None,
        }
    }

    /// Build the scene, taking tree types from the process-wide pool.
    pub fn build(&self) -> Result<ComponentRef, StrataError> {
        self.build_with(tree_types())
    }

    /// Build the scene, taking tree types from `pool`.
    pub fn build_with(
        &self,
        pool: &FlyweightPool<TreeKey, TreeType>,
    ) -> Result<ComponentRef, StrataError> {
        let nodes = self.root.count(0)?;
        if nodes > MAX_SCENE_NODES {
            return Err(StrataError::InvalidScene(format!(
                "{} nodes exceeds the maximum of {}",
                nodes, MAX_SCENE_NODES
            )));
        }

        let root = self.root.build(pool)?;
        if let Some(t) = self.transform {
            root.apply_transform(t.dx, t.dy);
        }
        tracing::debug!(nodes, "scene built");
        Ok(root)
    }

    /// Count nodes, trees and distinct tree types.
    pub fn stats(&self) -> Result<SceneStats, StrataError> {
        let nodes = self.root.count(0)?;
        let mut trees = 0;
        let mut kinds = BTreeSet::new();
        self.root.collect_trees(&mut trees, &mut kinds);
        Ok(SceneStats {
            nodes,
            trees,
            tree_types: kinds.len(),
        })
    }
}

impl NodeSpec {
    /// Count nodes, rejecting descriptions nested deeper than `MAX_SCENE_DEPTH`.
    fn count(&self, depth: usize) -> Result<usize, StrataError> {
        if depth >= MAX_SCENE_DEPTH {
            return Err(StrataError::InvalidScene(format!(
                "nesting deeper than {}",
                MAX_SCENE_DEPTH
            )));
        }
        match self {
            Self::Dot { .. } | Self::Circle { .. } | Self::Tree { .. } => Ok(1),
            Self::Group { children } => children.iter().try_fold(1usize, |acc, child| {
                Ok(acc.saturating_add(child.count(depth + 1)?))
            }),
            Self::Decorated { layers, inner } => {
                Ok(layers.len().saturating_add(inner.count(depth + 1)?))
            }
            Self::Cached { inner } => Ok(1usize.saturating_add(inner.count(depth + 1)?)),
        }
    }

    fn collect_trees(&self, trees: &mut usize, kinds: &mut BTreeSet<TreeKey>) {
        match self {
            Self::Tree {
                name,
                color,
                texture,
                ..
            } => {
                *trees += 1;
                kinds.insert(TreeKey::new(name.clone(), color.clone(), texture.clone()));
            }
            Self::Group { children } => {
                for child in children {
                    child.collect_trees(trees, kinds);
                }
            }
            Self::Decorated { inner, .. } | Self::Cached { inner } => {
                inner.collect_trees(trees, kinds);
            }
            Self::Dot { .. } | Self::Circle { .. } => {}
        }
    }

    fn build(&self, pool: &FlyweightPool<TreeKey, TreeType>) -> Result<ComponentRef, StrataError> {
        match self {
            Self::Dot { x, y } => Ok(ComponentRef::new(Dot::new(*x, *y))),
            Self::Circle { x, y, radius } => Ok(ComponentRef::new(Circle::new(*x, *y, *radius))),
            Self::Group { children } => {
                let built = children
                    .iter()
                    .map(|child| child.build(pool))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ComponentRef::new(Composite::with_children(built)))
            }
            Self::Decorated { layers, inner } => {
                if layers.is_empty() {
                    return Err(StrataError::InvalidScene(
                        "decorated node needs at least one layer".to_string(),
                    ));
                }
                let mut node = inner.build(pool)?;
                for layer in layers.iter().rev() {
                    node = ComponentRef::new(Decorator::with_boxed(layer.build(), node));
                }
                Ok(node)
            }
            Self::Cached { inner } => Ok(ComponentRef::new(RenderProxy::new(inner.build(pool)?))),
            Self::Tree {
                name,
                color,
                texture,
                x,
                y,
            } => {
                if name.is_empty() || color.is_empty() || texture.is_empty() {
                    return Err(StrataError::InvalidScene(
                        "tree needs a name, color and texture".to_string(),
                    ));
                }
                let key = TreeKey::new(name.clone(), color.clone(), texture.clone());
                Ok(ComponentRef::new(plant(pool, &key, *x, *y)))
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(name: &str, x: i64, y: i64) -> NodeSpec {
        NodeSpec::Tree {
            name: name.to_string(),
            color: "green".to_string(),
            texture: "rough".to_string(),
            x,
            y,
        }
    }

    #[test]
    fn demo_renders_in_declaration_order() {
        let root = SceneSpec::demo().build().expect("build");
        assert_eq!(
            root.render().expect("render").lines(),
            [
                "dot at (1, 2)",
                "circle at (4, 6) radius 10",
                "dot at (5, 9)",
                "circle at (3, 8) radius 7",
            ]
        );
    }

    #[test]
    fn transform_is_applied_after_building() {
        let scene = SceneSpec {
            root: NodeSpec::Dot { x: 1, y: 2 },
            transform: Some(TransformSpec { dx: 2, dy: 2 }),
        };
        let root = scene.build().expect("build");
        assert_eq!(root.position(), Some(crate::Point::new(3, 4)));
    }

    #[test]
    fn first_layer_is_outermost() {
        let scene = SceneSpec {
            root: NodeSpec::Decorated {
                layers: vec![LayerSpec::Encryption, LayerSpec::Compression],
                inner: Box::new(NodeSpec::Dot { x: 0, y: 0 }),
            },
            transform: None,
        };
        let render = scene.build().expect("build").render().expect("render");
        assert_eq!(
            render.lines(),
            ["encrypt", "compress", "dot at (0, 0)", "decompress", "decrypt"]
        );
    }

    #[test]
    fn empty_layer_list_is_rejected() {
        let scene = SceneSpec {
            root: NodeSpec::Decorated {
                layers: vec![],
                inner: Box::new(NodeSpec::Dot { x: 0, y: 0 }),
            },
            transform: None,
        };
        assert!(matches!(scene.build(), Err(StrataError::InvalidScene(_))));
    }

    #[test]
    fn trees_share_types_through_the_pool() {
        let pool = FlyweightPool::new();
        let scene = SceneSpec {
            root: NodeSpec::Group {
                children: vec![tree("oak", 0, 0), tree("oak", 1, 1), tree("elm", 2, 2)],
            },
            transform: None,
        };

        scene.build_with(&pool).expect("build");
        let stats = scene.stats().expect("stats");

        assert_eq!(pool.len(), 2);
        assert_eq!(
            stats,
            SceneStats {
                nodes: 4,
                trees: 3,
                tree_types: 2,
            }
        );
    }

    #[test]
    fn blank_tree_is_rejected() {
        let scene = SceneSpec {
            root: tree("", 0, 0),
            transform: None,
        };
        assert!(matches!(
            scene.build_with(&FlyweightPool::new()),
            Err(StrataError::InvalidScene(_))
        ));
    }

    #[test]
    fn excessive_nesting_is_rejected() {
        let mut node = NodeSpec::Dot { x: 0, y: 0 };
        for _ in 0..MAX_SCENE_DEPTH {
            node = NodeSpec::Group {
                children: vec![node],
            };
        }
        let scene = SceneSpec {
            root: node,
            transform: None,
        };
        assert!(matches!(scene.build(), Err(StrataError::InvalidScene(_))));
    }

    #[test]
    fn cached_node_counts_the_proxy() {
        let scene = SceneSpec {
            root: NodeSpec::Cached {
                inner: Box::new(NodeSpec::Dot { x: 0, y: 0 }),
            },
            transform: None,
        };
        let root = scene.build().expect("build");
        assert_eq!(root.kind(), "proxy");
        assert_eq!(root.node_count(), 2);
        assert_eq!(scene.stats().expect("stats").nodes, 2);
    }
}
