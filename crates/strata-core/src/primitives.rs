//! # Fixed Constants
//!
//! Compile-time constants for the Strata core.
//!
//! These values are immutable at runtime. Device bounds are not listed here:
//! clamping belongs to each device implementation, not to the remote.

/// Volume change applied by one `volume_up`/`volume_down` press.
pub const VOLUME_STEP: i32 = 10;

/// Channel change applied by one `channel_up`/`channel_down` press.
pub const CHANNEL_STEP: i32 = 1;

/// Maximum nesting depth accepted when building a scene description.
///
/// Scene files are external input; this bounds the recursion in
/// `SceneSpec::build`.
pub const MAX_SCENE_DEPTH: usize = 64;

/// Maximum number of nodes a scene description may declare.
pub const MAX_SCENE_NODES: usize = 100_000;

/// Default latency of the simulated video service, in milliseconds.
pub const DEFAULT_SERVICE_LATENCY_MS: u64 = 250;

/// Number of videos in the simulated service's default catalog.
pub const DEFAULT_CATALOG_SIZE: u64 = 10;
