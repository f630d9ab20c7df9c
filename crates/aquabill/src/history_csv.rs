//! Historical entries from CSV.
//!
//! Expected columns: `month_year`, `consumption`, `cycle_days` and an
//! optional `id`. Rows that fail to parse are skipped with a warning.

use anyhow::{bail, Context, Result};
use aquabill_core::HistoricalEntry;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Configuration for reading history CSV files.
#[derive(Debug, Clone)]
pub struct HistoryCsvConfig {
    /// Whether the file has a header row. Without one, columns are positional
    /// in the order `month_year, consumption, cycle_days, id`.
    pub has_header: bool,
    /// The field delimiter.
    pub delimiter: char,
}

impl Default for HistoryCsvConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: ',',
        }
    }
}

/// Entries read from a history file.
#[derive(Debug, Clone, Default)]
pub struct HistoryImport {
    /// Successfully parsed entries, in file order.
    pub entries: Vec<HistoricalEntry>,
    /// One message per skipped row.
    pub warnings: Vec<String>,
}

/// Read historical entries from a CSV file.
pub fn load_history_file(path: &Path, config: &HistoryCsvConfig) -> Result<HistoryImport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read history file {}", path.display()))?;
    load_history_str(&content, config)
}

/// Read historical entries from CSV text.
pub fn load_history_str(content: &str, config: &HistoryCsvConfig) -> Result<HistoryImport> {
    let delimiter = u8::try_from(config.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .with_context(|| {
            format!(
                "delimiter must be a single ASCII character, got '{}'",
                config.delimiter
            )
        })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(config.has_header)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = if config.has_header {
        let headers: HashMap<String, usize> = reader
            .headers()
            .context("failed to read history header")?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.to_ascii_lowercase(), i))
            .collect();
        Columns::from_headers(&headers)?
    } else {
        Columns::POSITIONAL
    };

    let mut import = HistoryImport::default();
    // Data rows start on line 2 when there is a header.
    let first_line = if config.has_header { 2 } else { 1 };

    for (offset, result) in reader.records().enumerate() {
        let row_num = first_line + offset;
        let parsed = result
            .map_err(anyhow::Error::from)
            .and_then(|record| parse_row(&record, &columns, row_num));

        match parsed {
            Ok(Some(entry)) => import.entries.push(entry),
            Ok(None) => {}
            Err(e) => {
                warn!(row = row_num, "skipping history row: {e:#}");
                import.warnings.push(format!("Row {row_num}: {e:#}"));
            }
        }
    }

    Ok(import)
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    month_year: usize,
    consumption: usize,
    cycle_days: usize,
    id: Option<usize>,
}

impl Columns {
    const POSITIONAL: Self = Self {
        month_year: 0,
        consumption: 1,
        cycle_days: 2,
        id: Some(3),
    };

    fn from_headers(headers: &HashMap<String, usize>) -> Result<Self> {
        let required = |name: &str| {
            headers
                .get(name)
                .copied()
                .with_context(|| format!("history header is missing column '{name}'"))
        };
        Ok(Self {
            month_year: required("month_year")?,
            consumption: required("consumption")?,
            cycle_days: required("cycle_days")?,
            id: headers.get("id").copied(),
        })
    }
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &Columns,
    row_num: usize,
) -> Result<Option<HistoricalEntry>> {
    let field = move |index: usize| record.get(index).unwrap_or_default();

    let month_year = field(columns.month_year);
    if month_year.is_empty() {
        return Ok(None); // Skip empty rows
    }

    let consumption = parse_volume(field(columns.consumption))?;
    if consumption.is_sign_negative() {
        bail!("consumption must not be negative, got {consumption}");
    }

    let cycle_days_text = field(columns.cycle_days);
    let cycle_days: u32 = cycle_days_text
        .parse()
        .with_context(|| format!("invalid cycle days '{cycle_days_text}'"))?;
    if cycle_days == 0 {
        bail!("cycle days must be positive");
    }

    let id = columns
        .id
        .map(field)
        .filter(|id| !id.is_empty())
        .map_or_else(|| format!("row-{row_num}"), ToString::to_string);

    let mut entry = HistoricalEntry::new(id, month_year, consumption, cycle_days);
    entry.month_year = entry.period()?.to_string();
    Ok(Some(entry))
}

/// Parse a volume written with either `.` or `,` as decimal separator.
fn parse_volume(text: &str) -> Result<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_str(&text.replace(',', ".")))
        .with_context(|| format!("invalid consumption '{text}'"))
}
