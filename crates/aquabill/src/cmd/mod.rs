//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod analyze;
pub mod community;
pub mod simulate;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// Install the stderr log subscriber.
///
/// `verbose` forces debug output; otherwise `RUST_LOG` decides, defaulting
/// to warnings only.
pub fn init_logging(verbose: bool) {
    let builder = tracing_subscriber::fmt().with_writer(std::io::stderr);
    // try_init: a subscriber may already be installed (e.g. under test).
    if verbose {
        let _ = builder.with_max_level(Level::DEBUG).try_init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = builder.with_env_filter(filter).try_init();
    }
}
