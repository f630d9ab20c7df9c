//! aquabill-community - Compare charged and calculated bills across a neighbourhood.
//!
//! # Usage
//!
//! ```bash
//! aquabill-community neighbourhood.json
//! aquabill-community neighbourhood.json --format json
//! ```
//!
//! The input file is a JSON array of entries:
//!
//! ```json
//! [
//!   { "name": "Casa 4", "charged_value": "210.40", "technical_value": "180.00", "consumption": "22" }
//! ]
//! ```

use anyhow::{Context, Result};
use aquabill_core::{community_stats, CommunityEntry, CommunityStats};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;

use super::{init_logging, OutputFormat};
use crate::report;

/// Aggregate charged and calculated bills of several residences.
#[derive(Parser, Debug)]
#[command(name = "aquabill-community")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file with the neighbourhood entries
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Serialize)]
struct CommunityReport<'a> {
    entries: &'a [CommunityEntry],
    stats: Option<CommunityStats>,
}

/// Read and parse a neighbourhood file.
pub fn read_entries(path: &Path) -> Result<Vec<CommunityEntry>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Main entry point for the community command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut stdout = io::stdout().lock();
    match run_with_writer(&args, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Run the command, writing results to `writer`.
pub fn run_with_writer<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    let entries = read_entries(&args.input)?;
    let stats = community_stats(&entries);
    debug!(entries = entries.len(), "aggregated neighbourhood");

    match args.format {
        OutputFormat::Text => report::write_community(&entries, stats.as_ref(), writer)?,
        OutputFormat::Json => {
            let community = CommunityReport {
                entries: &entries,
                stats,
            };
            serde_json::to_writer_pretty(&mut *writer, &community)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
