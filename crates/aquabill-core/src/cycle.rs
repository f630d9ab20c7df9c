//! Billing-cycle normalization.
//!
//! Meter readings are taken at irregular intervals. All comparisons and
//! billing use consumption rescaled to a 30-day month so that a 34-day cycle
//! does not land in higher tariff bands just because it was longer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Length of the normalized billing month, in days.
pub const NORMALIZED_DAYS: u32 = 30;

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Figures derived from two meter readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleData {
    /// Whole days between the readings, partial days rounded up.
    pub cycle_days: i64,
    /// Raw consumption over the cycle.
    pub consumption: Decimal,
    /// Average consumption per day.
    pub daily_consumption: Decimal,
    /// Consumption rescaled to a 30-day month.
    pub normalized_consumption: Decimal,
}

impl CycleData {
    /// Derive cycle figures from two calendar dates taken at midnight.
    #[must_use]
    pub fn from_dates(
        previous_date: NaiveDate,
        current_date: NaiveDate,
        previous_reading: Decimal,
        current_reading: Decimal,
    ) -> Self {
        calculate_cycle_data(
            previous_date.and_time(NaiveTime::MIN),
            current_date.and_time(NaiveTime::MIN),
            previous_reading,
            current_reading,
        )
    }
}

/// Days between two instants, rounding any partial day up.
///
/// Negative when `current` precedes `previous`.
#[must_use]
pub fn cycle_days_between(previous: NaiveDateTime, current: NaiveDateTime) -> i64 {
    let millis = (current - previous).num_milliseconds();
    // Ceiling division; `div_euclid` floors toward negative infinity.
    -((-millis).div_euclid(MILLIS_PER_DAY))
}

/// Rescale `consumption` measured over `days` to a 30-day month.
///
/// Returns zero when `days` is not positive. Consumption too large to scale
/// saturates before the division.
#[must_use]
pub fn normalize_to_month(consumption: Decimal, days: i64) -> Decimal {
    if days <= 0 {
        return Decimal::ZERO;
    }
    consumption.saturating_mul(Decimal::from(NORMALIZED_DAYS)) / Decimal::from(days)
}

/// Compute cycle length, consumption and the normalized monthly figure.
///
/// Callers must ensure `current_date` is after `previous_date`; otherwise the
/// daily and normalized figures come back as zero. Inconsistent readings are
/// not clamped.
///
/// # Example
///
/// ```
/// use aquabill_core::{calculate_cycle_data, NaiveDate};
/// use chrono::NaiveTime;
/// use rust_decimal_macros::dec;
///
/// let previous = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_time(NaiveTime::MIN);
/// let current = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap().and_time(NaiveTime::MIN);
///
/// let cycle = calculate_cycle_data(previous, current, dec!(100), dec!(135));
/// assert_eq!(cycle.cycle_days, 35);
/// assert_eq!(cycle.daily_consumption, dec!(1));
/// assert_eq!(cycle.normalized_consumption, dec!(30));
/// ```
#[must_use]
pub fn calculate_cycle_data(
    previous_date: NaiveDateTime,
    current_date: NaiveDateTime,
    previous_reading: Decimal,
    current_reading: Decimal,
) -> CycleData {
    let cycle_days = cycle_days_between(previous_date, current_date);
    let consumption = current_reading.saturating_sub(previous_reading);
    let daily_consumption = if cycle_days > 0 {
        consumption / Decimal::from(cycle_days)
    } else {
        Decimal::ZERO
    };

    CycleData {
        cycle_days,
        consumption,
        daily_consumption,
        normalized_consumption: normalize_to_month(consumption, cycle_days),
    }
}
