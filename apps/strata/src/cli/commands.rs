//! # CLI Command Implementations
//!
//! Each `cmd_*` function prints its result as text or JSON. The work itself
//! lives in a companion function returning a serializable report, so the
//! integration tests can check results without capturing stdout.

use super::{DeviceKind, RemoteOp};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strata_core::{
    AdvancedRemote, ComponentRef, Composite, Device, DeviceState, FlyweightPool, Radio, Remote,
    RemoteControl, Render, SceneSpec, SceneStats, StrataError, ThirdPartyVideoService, TreeKey,
    TreeType, Tv, VideoId, VideoManager, VideoProxy,
    flyweight::SPECIES,
    plant,
    primitives::DEFAULT_SERVICE_LATENCY_MS,
    tree_types,
};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum size of a scene description file (10 MB).
const MAX_SCENE_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Number of rendered trees shown by the `forest` command.
const FOREST_SAMPLE_SIZE: usize = 5;

/// Trees per row when laying out a forest.
const FOREST_ROW_WIDTH: usize = 100;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), StrataError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| StrataError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(StrataError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

/// Validate an input path.
///
/// Canonicalizes the path (resolving ".." and symlinks, which also checks
/// that it exists) and requires a regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, StrataError> {
    let canonical = path.canonicalize().map_err(|e| {
        StrataError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(StrataError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

/// Serialize `value` as pretty JSON on stdout.
fn print_json(value: &impl Serialize) -> Result<(), StrataError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| StrataError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Get the simulated service latency from the environment.
///
/// Returns the value of `STRATA_SERVICE_LATENCY_MS`, or
/// `DEFAULT_SERVICE_LATENCY_MS` if unset or not a number.
pub fn get_service_latency_from_env() -> u64 {
    std::env::var("STRATA_SERVICE_LATENCY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SERVICE_LATENCY_MS)
}

// =============================================================================
// SCENE LOADING
// =============================================================================

/// Parse a scene description. JSON when `json` is set, TOML otherwise.
pub fn parse_scene(contents: &str, json: bool) -> Result<SceneSpec, StrataError> {
    if json {
        serde_json::from_str(contents)
            .map_err(|e| StrataError::SerializationError(format!("Invalid JSON scene: {}", e)))
    } else {
        toml::from_str(contents)
            .map_err(|e| StrataError::SerializationError(format!("Invalid TOML scene: {}", e)))
    }
}

/// Load a scene description from disk.
///
/// Files with a `.json` extension are read as JSON, anything else as TOML.
pub fn load_scene(path: &Path) -> Result<SceneSpec, StrataError> {
    let validated_path = validate_file_path(path)?;
    validate_file_size(&validated_path, MAX_SCENE_FILE_SIZE)?;

    let contents = std::fs::read_to_string(&validated_path)
        .map_err(|e| StrataError::IoError(format!("Read file: {}", e)))?;

    let json = validated_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    tracing::debug!(path = %validated_path.display(), json, "loading scene");
    parse_scene(&contents, json)
}

// =============================================================================
// RENDER COMMAND
// =============================================================================

/// Rendered lines of a scene together with its statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RenderReport {
    /// Render output, one entry per line.
    pub lines: Vec<String>,
    /// Counts taken from the description.
    pub stats: SceneStats,
}

/// Build `spec`, move it by `(dx, dy)` and render it.
pub fn render_scene(spec: &SceneSpec, dx: i64, dy: i64) -> Result<RenderReport, StrataError> {
    let stats = spec.stats()?;
    let root = spec.build()?;

    if dx != 0 || dy != 0 {
        root.apply_transform(dx, dy);
    }

    let lines = root.render()?.into_lines();
    Ok(RenderReport { lines, stats })
}

fn print_render_report(report: &RenderReport, json_mode: bool) -> Result<(), StrataError> {
    if json_mode {
        return print_json(report);
    }

    for line in &report.lines {
        println!("{}", line);
    }
    println!();
    println!(
        "Nodes: {}  Trees: {}  Tree types: {}",
        report.stats.nodes, report.stats.trees, report.stats.tree_types
    );
    Ok(())
}

/// Render a scene file.
pub fn cmd_render(scene: &Path, dx: i64, dy: i64, json_mode: bool) -> Result<(), StrataError> {
    tracing::info!("Rendering {:?} (dx: {}, dy: {})", scene, dx, dy);

    let spec = load_scene(scene)?;
    let report = render_scene(&spec, dx, dy)?;
    print_render_report(&report, json_mode)
}

/// Render the built-in demo scene.
pub fn cmd_demo(json_mode: bool) -> Result<(), StrataError> {
    let report = render_scene(&SceneSpec::demo(), 0, 0)?;
    print_render_report(&report, json_mode)
}

// =============================================================================
// FOREST COMMAND
// =============================================================================

/// Outcome of planting a forest.
#[derive(Debug, Clone, Serialize)]
pub struct ForestReport {
    /// Trees planted.
    pub trees: usize,
    /// Tree types held by the pool afterwards.
    pub tree_types: usize,
    /// Rendered lines of the first few trees.
    pub sample: Vec<String>,
}

/// Plant `count` trees cycling through the built-in species.
///
/// Trees are laid out row by row and collected into one composite.
pub fn plant_forest(
    pool: &FlyweightPool<TreeKey, TreeType>,
    count: usize,
) -> Result<ForestReport, StrataError> {
    let keys: Vec<TreeKey> = SPECIES
        .iter()
        .map(|(name, color, texture)| TreeKey::new(*name, *color, *texture))
        .collect();

    let trees: Vec<ComponentRef> = (0..count)
        .zip(keys.iter().cycle())
        .map(|(i, key)| {
            let x = (i % FOREST_ROW_WIDTH) as i64;
            let y = (i / FOREST_ROW_WIDTH) as i64;
            ComponentRef::new(plant(pool, key, x, y))
        })
        .collect();

    let sample = trees
        .iter()
        .take(FOREST_SAMPLE_SIZE)
        .map(|tree| tree.render().map(Render::into_lines))
        .collect::<Result<Vec<_>, _>>()?
        .concat();

    let forest = Composite::with_children(trees);
    tracing::debug!(trees = forest.len(), tree_types = pool.len(), "forest planted");

    Ok(ForestReport {
        trees: forest.len(),
        tree_types: pool.len(),
        sample,
    })
}

/// Plant a forest through the process-wide tree-type pool.
pub fn cmd_forest(count: usize, json_mode: bool) -> Result<(), StrataError> {
    tracing::info!("Planting {} trees", count);

    let report = plant_forest(tree_types(), count)?;

    if json_mode {
        return print_json(&report);
    }

    println!("Strata Forest");
    println!("=============");
    println!("Trees planted: {}", report.trees);
    println!("Tree types:    {}", report.tree_types);
    if !report.sample.is_empty() {
        println!();
        for line in &report.sample {
            println!("  {}", line);
        }
        if report.trees > report.sample.len() {
            println!("  ... {} more", report.trees - report.sample.len());
        }
    }

    Ok(())
}

// =============================================================================
// VIDEOS COMMAND
// =============================================================================

/// Outcome of a browsing session.
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    /// Page shown for each view.
    pub responses: Vec<String>,
    /// Requests that reached the service.
    pub service_calls: u64,
    /// Requests answered by the cache.
    pub cache_hits: u64,
    /// Requests forwarded by the cache.
    pub cache_misses: u64,
}

/// Open the page of video `id` `repeat` times through a caching proxy.
///
/// With `reset_between`, the cache is dropped before every view but the first.
pub fn browse_videos(
    id: u64,
    repeat: usize,
    latency: Duration,
    reset_between: bool,
) -> Result<VideoReport, StrataError> {
    let manager = VideoManager::new(VideoProxy::new(ThirdPartyVideoService::new(latency)));

    let mut responses = Vec::with_capacity(repeat);
    for view in 0..repeat {
        if reset_between && view > 0 {
            manager.reset();
        }
        responses.push(manager.react_on_user_input(VideoId(id))?);
    }

    let proxy = manager.service();
    Ok(VideoReport {
        responses,
        service_calls: proxy.service().calls(),
        cache_hits: proxy.cache().hits(),
        cache_misses: proxy.cache().misses(),
    })
}

/// Browse a video through the caching proxy.
pub fn cmd_videos(
    id: u64,
    repeat: usize,
    latency_ms: u64,
    reset_between: bool,
    json_mode: bool,
) -> Result<(), StrataError> {
    tracing::info!(
        "Opening video #{} {} times (latency: {}ms, reset between: {})",
        id,
        repeat,
        latency_ms,
        reset_between
    );

    let report = browse_videos(id, repeat, Duration::from_millis(latency_ms), reset_between)?;

    if json_mode {
        return print_json(&report);
    }

    for (view, page) in report.responses.iter().enumerate() {
        println!("--- view {} ---", view + 1);
        println!("{}", page);
    }
    println!();
    println!("Service calls: {}", report.service_calls);
    println!("Cache hits:    {}", report.cache_hits);
    println!("Cache misses:  {}", report.cache_misses);

    Ok(())
}

// =============================================================================
// REMOTE COMMAND
// =============================================================================

/// Apply one operation available on every remote.
fn apply_basic(remote: &mut impl RemoteControl, op: RemoteOp) -> Result<(), StrataError> {
    match op {
        RemoteOp::Power => remote.toggle_power(),
        RemoteOp::Up => remote.volume_up(),
        RemoteOp::Down => remote.volume_down(),
        RemoteOp::Next => remote.channel_up(),
        RemoteOp::Prev => remote.channel_down(),
        RemoteOp::Mute => {
            return Err(StrataError::OperationNotSupported {
                operation: "mute",
                kind: "remote",
            });
        }
    }
    Ok(())
}

/// Apply `ops` in order to a fresh device and return its final state.
///
/// `mute` fails with `OperationNotSupported` unless `advanced` is set.
pub fn operate_remote(
    device: DeviceKind,
    advanced: bool,
    ops: &[RemoteOp],
) -> Result<DeviceState, StrataError> {
    let device: Box<dyn Device> = match device {
        DeviceKind::Tv => Box::new(Tv::new()),
        DeviceKind::Radio => Box::new(Radio::new()),
    };

    if advanced {
        let mut remote = AdvancedRemote::new(device);
        for &op in ops {
            match op {
                RemoteOp::Mute => remote.mute(),
                other => apply_basic(&mut remote, other)?,
            }
        }
        Ok(remote.state())
    } else {
        let mut remote = Remote::new(device);
        for &op in ops {
            apply_basic(&mut remote, op)?;
        }
        Ok(remote.state())
    }
}

/// Operate a device through a remote control.
pub fn cmd_remote(
    device: DeviceKind,
    advanced: bool,
    ops: &[RemoteOp],
    json_mode: bool,
) -> Result<(), StrataError> {
    tracing::info!("Operating {:?} (advanced: {}) with {:?}", device, advanced, ops);

    let state = operate_remote(device, advanced, ops)?;

    if json_mode {
        return print_json(&state);
    }

    println!("Device: {:?}", device);
    println!("Power:   {}", if state.enabled { "on" } else { "off" });
    println!("Volume:  {}", state.volume);
    println!("Channel: {}", state.channel);

    Ok(())
}
