//! # strata-core
//!
//! The structural composition & delegation core for Strata - THE LOGIC.
//!
//! Every node in a structure satisfies one capability contract, `Component`.
//! On top of that contract the crate provides:
//! - `composite`: ordered trees of components
//! - `decorator`: chains of behavior layers around one component
//! - `proxy`: memoizing delegation to a costly collaborator
//! - `flyweight`: a pool of deduplicated, immutable shared state
//! - `bridge`: remote controls decoupled from the devices they drive
//! - `adapter`: a square peg presented through the round peg interface
//! - `facade`: one call in front of a multi-step video conversion
//! - `scene`: a serde description that builds component trees
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Synchronous call chains; only the proxy cache and the flyweight pool are
//!   meant to be shared across threads
//! - The core never panics; all errors are `StrataError`

// =============================================================================
// MODULES
// =============================================================================

pub mod adapter;
pub mod bridge;
pub mod component;
pub mod composite;
pub mod decorator;
pub mod facade;
pub mod flyweight;
pub mod leaf;
pub mod primitives;
pub mod proxy;
pub mod scene;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{Point, Render, StrataError};

// =============================================================================
// RE-EXPORTS: Structure
// =============================================================================

pub use component::{Component, ComponentRef, attach, detach};
pub use composite::Composite;
pub use decorator::{Compression, Decorator, Encryption, Layer, Outline};
pub use leaf::{Circle, Dot};

// =============================================================================
// RE-EXPORTS: Delegation & Sharing
// =============================================================================

pub use flyweight::{Draw, Flyweight, FlyweightPool, Tree, TreeKey, TreeType, plant, tree_types};
pub use proxy::{
    CacheProxy, Invalidate, RenderProxy, Request, ThirdPartyVideoService, VideoId, VideoManager,
    VideoProxy, VideoService,
};

// =============================================================================
// RE-EXPORTS: Bridge, Adapter, Facade & Scene
// =============================================================================

pub use adapter::{Peg, RoundHole, RoundPeg, SquarePeg, SquarePegAdapter};
pub use bridge::{AdvancedRemote, Device, DeviceState, Radio, Remote, RemoteControl, Tv};
pub use facade::{Codec, Conversion, VideoConverter};
pub use scene::{LayerSpec, NodeSpec, SceneSpec, SceneStats, TransformSpec};
