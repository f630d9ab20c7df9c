//! aquabill-analyze - Analyse a water bill.
//!
//! # Usage
//!
//! ```bash
//! aquabill-analyze residence.json
//! aquabill-analyze residence.json --history history.csv --format json
//! aquabill-analyze residence.json --synthesis
//! ```
//!
//! The input file holds the residence record and optionally its history:
//!
//! ```json
//! {
//!   "residence": {
//!     "user_name": "Ana Souza",
//!     "account_id": "004512-3",
//!     "previous_reading_date": "2024-04-01",
//!     "current_reading_date": "2024-05-03",
//!     "previous_reading": "1520",
//!     "current_reading": "1551",
//!     "charged_value": "372.10",
//!     "fixed_fee": "25.00",
//!     "include_sewer": true
//!   },
//!   "history": [
//!     { "id": "1", "month_year": "03/2024", "consumption": "27", "cycle_days": 30 }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use aquabill_core::{
    analyze, generate_synthesis, january_entries, Analysis, AnalysisOptions, HistoricalEntry,
    ReadinessError, ResidenceData,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use super::{init_logging, OutputFormat};
use crate::history_csv::{load_history_file, HistoryCsvConfig};
use crate::report;

/// Analyse a water bill against its reading cycle and history.
#[derive(Parser, Debug)]
#[command(name = "aquabill-analyze")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file with the residence record and optional history
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// CSV file with historical entries (month_year, consumption, cycle_days[, id])
    #[arg(long, value_name = "CSV")]
    pub history: Option<PathBuf>,

    /// Field delimiter of the history CSV
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// The history CSV has no header row
    #[arg(long)]
    pub no_header: bool,

    /// Keep January entries in the historical baseline
    #[arg(long)]
    pub include_january: bool,

    /// Write the narrative report (added as `synthesis` in JSON output)
    #[arg(long)]
    pub synthesis: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Contents of the input file.
#[derive(Debug, Deserialize)]
pub struct AnalysisInput {
    /// The residence record.
    pub residence: ResidenceData,
    /// Historical entries.
    #[serde(default)]
    pub history: Vec<HistoricalEntry>,
}

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    #[serde(flatten)]
    analysis: &'a Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    synthesis: Option<String>,
}

/// Read and parse an input file.
pub fn read_input(path: &Path) -> Result<AnalysisInput> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

/// Main entry point for the analyze command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if e.downcast_ref::<ReadinessError>().is_some() {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut stdout = io::stdout().lock();
    run_with_writer(args, &mut stdout)
}

/// Run the command, writing results to `writer`.
pub fn run_with_writer<W: Write>(args: &Args, writer: &mut W) -> Result<()> {
    debug!(input = %args.input.display(), "loading input");
    let input = read_input(&args.input)?;
    let mut history = input.history;

    if let Some(path) = &args.history {
        let config = HistoryCsvConfig {
            has_header: !args.no_header,
            delimiter: args.delimiter,
        };
        let import = load_history_file(path, &config)?;
        for warning in &import.warnings {
            eprintln!("warning: {}: {warning}", path.display());
        }
        info!(
            entries = import.entries.len(),
            skipped = import.warnings.len(),
            "loaded history"
        );
        history.extend(import.entries);
    }

    let options = AnalysisOptions {
        exclude_january: !args.include_january,
    };
    if options.exclude_january {
        let dropped = january_entries(&history);
        if dropped > 0 {
            warn!(dropped, "January entries excluded from the baseline");
        }
    }

    let analysis = analyze(&input.residence, &history, &options)?;

    let synthesis = args.synthesis.then(|| generate_synthesis(&analysis));

    match (args.format, synthesis) {
        (OutputFormat::Text, Some(text)) => write!(writer, "{text}")?,
        (OutputFormat::Text, None) => report::write_analysis(&analysis, writer)?,
        (OutputFormat::Json, synthesis) => {
            let output = AnalysisOutput {
                analysis: &analysis,
                synthesis,
            };
            serde_json::to_writer_pretty(&mut *writer, &output)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
