//! aquabill-simulate - Bill a monthly volume against the progressive tariff.
//!
//! # Usage
//!
//! ```bash
//! aquabill-simulate 34.5
//! aquabill-simulate 34.5 --fixed-fee 30 --no-sewer --format json
//! ```

use anyhow::Result;
use aquabill_core::{calculate_water_bill, tariff_table, TariffBand, WaterBillResult};
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::debug;

use super::{init_logging, OutputFormat};
use crate::report;

/// Bill a normalized monthly volume against the tariff table.
#[derive(Parser, Debug)]
#[command(name = "aquabill-simulate")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Normalized monthly consumption, in m³
    #[arg(value_name = "VOLUME", value_parser = parse_amount)]
    pub volume: Decimal,

    /// Fixed service fee
    #[arg(long, default_value = "25.00", value_parser = parse_amount)]
    pub fixed_fee: Decimal,

    /// Do not bill sewer on top of water
    #[arg(long)]
    pub no_sewer: bool,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_amount(text: &str) -> Result<Decimal, String> {
    let value: Decimal = text
        .replace(',', ".")
        .parse()
        .map_err(|e| format!("invalid number '{text}': {e}"))?;
    if value.is_sign_negative() {
        return Err(format!("must not be negative: {text}"));
    }
    Ok(value)
}

#[derive(Serialize)]
struct Simulation<'a> {
    tariff: &'a [TariffBand],
    bill: &'a WaterBillResult,
}

/// Main entry point for the simulate command.
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
    let bill = calculate_water_bill(args.volume, !args.no_sewer, args.fixed_fee);
    debug!(volume = %args.volume, total = %bill.total, "simulated bill");

    match args.format {
        OutputFormat::Text => {
            report::write_tariff_table(tariff_table(), writer)?;
            writeln!(writer)?;
            report::write_bill(&bill, writer)?;
        }
        OutputFormat::Json => {
            let simulation = Simulation {
                tariff: tariff_table(),
                bill: &bill,
            };
            serde_json::to_writer_pretty(&mut *writer, &simulation)?;
            writeln!(writer)?;
        }
    }

    Ok(())
}
