//! End-to-end analysis of a residence record.
//!
//! Runs the readiness check, then cycle normalization, the historical
//! baseline, classification, billing, comparison and diagnosis. Nothing is
//! cached between calls.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::bill::{calculate_water_bill, WaterBillResult};
use crate::classify::{classify_consumption, ConsumptionClassification};
use crate::comparison::{compare_bill, BillComparison};
use crate::cycle::CycleData;
use crate::diagnosis::{generate_diagnosis, DiagnosisItem};
use crate::history::{calculate_historical_average, HistoricalAverage, HistoricalEntry};
use crate::residence::{ReadinessError, ResidenceData};

/// Knobs for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Drop January entries from the baseline.
    pub exclude_january: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            exclude_january: true,
        }
    }
}

/// Everything derived from one residence record and its history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// The analysed record.
    pub residence: ResidenceData,
    /// Cycle figures.
    pub cycle: CycleData,
    /// Bill for the normalized consumption.
    pub bill: WaterBillResult,
    /// Historical baseline.
    pub historical_average: HistoricalAverage,
    /// Classification against the baseline, `None` without one.
    pub classification: Option<ConsumptionClassification>,
    /// Charged versus calculated.
    pub comparison: BillComparison,
    /// Ordered findings.
    pub diagnosis: Vec<DiagnosisItem>,
    /// The history the baseline was computed from.
    pub historical_entries: Vec<HistoricalEntry>,
    /// Whether January entries were left out of the baseline.
    pub exclude_january: bool,
}

impl Analysis {
    /// The monthly average, `None` without a baseline.
    #[must_use]
    pub fn baseline(&self) -> Option<Decimal> {
        (self.historical_average.monthly_average > Decimal::ZERO)
            .then_some(self.historical_average.monthly_average)
    }
}

/// Analyse a residence record against its history.
///
/// Fails only when the record is not ready; every computation after the
/// readiness check is infallible.
pub fn analyze(
    residence: &ResidenceData,
    history: &[HistoricalEntry],
    options: &AnalysisOptions,
) -> Result<Analysis, ReadinessError> {
    let readings = residence.check_ready()?;

    let cycle = readings.cycle_data();
    debug!(
        cycle_days = cycle.cycle_days,
        consumption = %cycle.consumption,
        normalized = %cycle.normalized_consumption,
        "normalized billing cycle"
    );

    let historical_average = calculate_historical_average(history, options.exclude_january);
    debug!(
        entries = history.len(),
        valid = historical_average.valid_entry_count,
        monthly_average = %historical_average.monthly_average,
        "computed historical baseline"
    );

    let average = historical_average.monthly_average;
    let classification = (average > Decimal::ZERO)
        .then(|| classify_consumption(cycle.normalized_consumption, average));

    let bill = calculate_water_bill(
        cycle.normalized_consumption,
        residence.include_sewer,
        residence.fixed_fee,
    );
    debug!(total = %bill.total, bands = bill.breakdown.len(), "calculated bill");

    let comparison = compare_bill(
        residence.charged_value,
        &bill,
        cycle.normalized_consumption,
        average,
    );
    let diagnosis = generate_diagnosis(
        cycle.cycle_days,
        cycle.normalized_consumption,
        average,
        residence.charged_value,
        bill.total,
    );

    Ok(Analysis {
        residence: residence.clone(),
        cycle,
        bill,
        historical_average,
        classification,
        comparison,
        diagnosis,
        historical_entries: history.to_vec(),
        exclude_january: options.exclude_january,
    })
}
