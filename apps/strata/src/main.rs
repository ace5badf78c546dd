//! # Strata - Structural Composition CLI
//!
//! The main binary for the Strata composition core.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            apps/strata (THE BINARY)           │
//! │                                               │
//! │   ┌─────────────┐        ┌────────────────┐   │
//! │   │    CLI      │        │  Scene loader  │   │
//! │   │   (clap)    │        │ (toml / json)  │   │
//! │   └──────┬──────┘        └───────┬────────┘   │
//! │          └───────────┬───────────┘            │
//! │                      ▼                        │
//! │              ┌───────────────┐                │
//! │              │  strata-core  │                │
//! │              │  (THE LOGIC)  │                │
//! │              └───────────────┘                │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! strata render -s scene.toml --dx 2 --dy 2
//! strata forest -c 10000
//! strata videos --id 5 --repeat 3 --reset-between
//! strata remote -d radio --advanced -o power,up,up,mute
//! ```

use clap::Parser;
use strata::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Initialize tracing. STRATA_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("STRATA_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "strata=debug,strata_core=debug"
    } else {
        "strata=info,strata_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Strata startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─┐┌┬┐┬─┐┌─┐┌┬┐┌─┐
  └─┐ │ ├┬┘├─┤ │ ├─┤
  └─┘ ┴ ┴└─┴ ┴ ┴ ┴ ┴

  Strata v{}

  Composite • Decorator • Proxy • Flyweight • Bridge
"#,
        env!("CARGO_PKG_VERSION")
    );
}
