//! # Strata CLI Module
//!
//! This module implements the CLI interface for Strata.
//!
//! ## Available Commands
//!
//! - `render` - Build a scene file, optionally transform it, and render it
//! - `forest` - Plant trees that share their types through the flyweight pool
//! - `videos` - Drive the caching proxy over the simulated video service
//! - `remote` - Apply remote-control operations to a device
//!
//! Without a subcommand the built-in demo scene is rendered.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strata_core::StrataError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Strata - structural composition core
///
/// Builds trees of components, stacks behaviors onto them, caches expensive
/// results and shares common state between many small objects.
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build and render a scene file (TOML or JSON)
    Render {
        /// Path to the scene description
        #[arg(short, long)]
        scene: PathBuf,

        /// Horizontal offset applied after building
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        dx: i64,

        /// Vertical offset applied after building
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        dy: i64,
    },

    /// Plant a forest through the shared tree-type pool
    Forest {
        /// Number of trees to plant
        #[arg(short, long, default_value = "1000")]
        count: usize,
    },

    /// Browse videos through the caching proxy
    Videos {
        /// Video to open
        #[arg(long, default_value = "1")]
        id: u64,

        /// How many times the user opens the page
        #[arg(short, long, default_value = "2")]
        repeat: usize,

        /// Simulated service latency in milliseconds
        #[arg(long)]
        latency_ms: Option<u64>,

        /// Drop the cache between two page views
        #[arg(long)]
        reset_between: bool,
    },

    /// Operate a device through a remote control
    Remote {
        /// Device to control
        #[arg(short, long, value_enum)]
        device: DeviceKind,

        /// Use the advanced remote (enables `mute`)
        #[arg(short, long)]
        advanced: bool,

        /// Operations to apply, in order (comma-separated)
        #[arg(short, long, value_enum, value_delimiter = ',')]
        ops: Vec<RemoteOp>,
    },
}

/// Devices available to the `remote` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Television, unbounded volume
    Tv,
    /// Radio, volume clamped to 0..=100
    Radio,
}

/// Remote-control operations.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOp {
    /// Toggle power
    Power,
    /// Volume up
    Up,
    /// Volume down
    Down,
    /// Next channel
    Next,
    /// Previous channel
    Prev,
    /// Mute (advanced remote only)
    Mute,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), StrataError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Render { scene, dx, dy }) => cmd_render(&scene, dx, dy, json_mode),
        Some(Commands::Forest { count }) => cmd_forest(count, json_mode),
        Some(Commands::Videos {
            id,
            repeat,
            latency_ms,
            reset_between,
        }) => {
            let latency = latency_ms.unwrap_or_else(get_service_latency_from_env);
            cmd_videos(id, repeat, latency, reset_between, json_mode)
        }
        Some(Commands::Remote {
            device,
            advanced,
            ops,
        }) => cmd_remote(device, advanced, &ops, json_mode),
        None => {
            // No subcommand - render the demo scene
            cmd_demo(json_mode)
        }
    }
}
