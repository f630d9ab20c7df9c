//! Historical consumption baseline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::cycle::{normalize_to_month, NORMALIZED_DAYS};

/// Month prefix of seasonally atypical entries.
const JANUARY_PREFIX: &str = "01";

/// Errors from parsing historical entry fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// The month/year text is not `MM/YYYY` with a month in 1..=12.
    #[error("invalid month/year '{text}', expected MM/YYYY")]
    InvalidMonthYear {
        /// The rejected text.
        text: String,
    },
}

/// A past billing period supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    /// Unique identifier of the entry.
    pub id: String,
    /// Billing month as `MM/YYYY`.
    pub month_year: String,
    /// Consumption over the period, in m³.
    pub consumption: Decimal,
    /// Length of the period, in days.
    pub cycle_days: u32,
}

impl HistoricalEntry {
    /// Create a new historical entry.
    pub fn new(
        id: impl Into<String>,
        month_year: impl Into<String>,
        consumption: Decimal,
        cycle_days: u32,
    ) -> Self {
        Self {
            id: id.into(),
            month_year: month_year.into(),
            consumption,
            cycle_days,
        }
    }

    /// Whether the entry falls in January, judged by its month prefix.
    #[must_use]
    pub fn is_january(&self) -> bool {
        self.month_year.split('/').next() == Some(JANUARY_PREFIX)
    }

    /// Average consumption per day, zero for a zero-day period.
    #[must_use]
    pub fn daily_consumption(&self) -> Decimal {
        if self.cycle_days == 0 {
            Decimal::ZERO
        } else {
            self.consumption / Decimal::from(self.cycle_days)
        }
    }

    /// Consumption rescaled to a 30-day month.
    #[must_use]
    pub fn normalized_consumption(&self) -> Decimal {
        normalize_to_month(self.consumption, i64::from(self.cycle_days))
    }

    /// Parsed billing month.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::InvalidMonthYear`] when `month_year` is not
    /// `MM/YYYY`.
    pub fn period(&self) -> Result<MonthYear, HistoryError> {
        self.month_year.parse()
    }
}

/// Mean normalized consumption over a set of historical entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalAverage {
    /// Mean consumption per 30-day month.
    pub monthly_average: Decimal,
    /// `monthly_average / 30`.
    pub daily_average: Decimal,
    /// Number of entries that contributed to the average.
    pub valid_entry_count: usize,
}

impl HistoricalAverage {
    /// Whether any entry contributed. A zero average without entries means
    /// "no baseline", not "no usage".
    #[must_use]
    pub const fn has_baseline(&self) -> bool {
        self.valid_entry_count > 0
    }
}

/// Average the normalized consumption of `entries`.
///
/// With `exclude_january`, entries whose month starts with `01` are dropped
/// first. An empty remainder yields an all-zero average with a count of zero.
///
/// # Example
///
/// ```
/// use aquabill_core::{calculate_historical_average, HistoricalEntry};
/// use rust_decimal_macros::dec;
///
/// let entries = vec![
///     HistoricalEntry::new("a", "01/2024", dec!(20), 30),
///     HistoricalEntry::new("b", "02/2024", dec!(10), 30),
/// ];
///
/// let average = calculate_historical_average(&entries, true);
/// assert_eq!(average.monthly_average, dec!(10));
/// assert_eq!(average.valid_entry_count, 1);
/// ```
#[must_use]
pub fn calculate_historical_average(
    entries: &[HistoricalEntry],
    exclude_january: bool,
) -> HistoricalAverage {
    let (total, count) = entries
        .iter()
        .filter(|entry| !(exclude_january && entry.is_january()))
        .fold((Decimal::ZERO, 0usize), |(total, count), entry| {
            (total.saturating_add(entry.normalized_consumption()), count + 1)
        });

    if count == 0 {
        return HistoricalAverage::default();
    }

    let monthly_average = total / Decimal::from(count);
    HistoricalAverage {
        monthly_average,
        daily_average: monthly_average / Decimal::from(NORMALIZED_DAYS),
        valid_entry_count: count,
    }
}

/// Number of entries the January exclusion would drop.
#[must_use]
pub fn january_entries(entries: &[HistoricalEntry]) -> usize {
    entries.iter().filter(|entry| entry.is_january()).count()
}

/// A billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthYear {
    /// Year, e.g. 2024.
    pub year: i32,
    /// Month in 1..=12.
    pub month: u32,
}

impl FromStr for MonthYear {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HistoryError::InvalidMonthYear {
            text: s.to_string(),
        };

        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(month_year: &str, consumption: Decimal, cycle_days: u32) -> HistoricalEntry {
        HistoricalEntry::new(month_year, month_year, consumption, cycle_days)
    }

    #[test]
    fn test_january_excluded() {
        let entries = vec![entry("01/2024", dec!(20), 30), entry("02/2024", dec!(10), 30)];
        let average = calculate_historical_average(&entries, true);
        assert_eq!(average.monthly_average, dec!(10));
        assert_eq!(average.valid_entry_count, 1);
    }

    #[test]
    fn test_january_kept_when_not_excluded() {
        let entries = vec![entry("01/2024", dec!(20), 30), entry("02/2024", dec!(10), 30)];
        let average = calculate_historical_average(&entries, false);
        assert_eq!(average.monthly_average, dec!(15));
        assert_eq!(average.daily_average, dec!(0.5));
        assert_eq!(average.valid_entry_count, 2);
    }

    #[test]
    fn test_empty_baseline() {
        let average = calculate_historical_average(&[], true);
        assert_eq!(average.monthly_average, Decimal::ZERO);
        assert_eq!(average.daily_average, Decimal::ZERO);
        assert_eq!(average.valid_entry_count, 0);
        assert!(!average.has_baseline());
    }

    #[test]
    fn test_only_january_is_empty_baseline() {
        let entries = vec![entry("01/2023", dec!(20), 30), entry("01/2024", dec!(25), 31)];
        let average = calculate_historical_average(&entries, true);
        assert_eq!(average, HistoricalAverage::default());
        assert_eq!(january_entries(&entries), 2);
    }

    #[test]
    fn test_entries_normalized_before_averaging() {
        // 20 m³ over 40 days -> 15 m³/month, 12 m³ over 24 days -> 15 m³/month
        let entries = vec![entry("03/2024", dec!(20), 40), entry("04/2024", dec!(12), 24)];
        let average = calculate_historical_average(&entries, true);
        assert_eq!(average.monthly_average, dec!(15));
    }

    #[test]
    fn test_zero_day_entry_counts_as_zero() {
        let entries = vec![entry("03/2024", dec!(20), 0), entry("04/2024", dec!(20), 30)];
        assert_eq!(entries[0].daily_consumption(), Decimal::ZERO);
        let average = calculate_historical_average(&entries, true);
        assert_eq!(average.monthly_average, dec!(10));
        assert_eq!(average.valid_entry_count, 2);
    }

    #[test]
    fn test_january_prefix_rule() {
        assert!(entry("01/2024", dec!(1), 30).is_january());
        assert!(!entry("10/2024", dec!(1), 30).is_january());
        assert!(!entry("11/2001", dec!(1), 30).is_january());
        assert!(!entry("1/2024", dec!(1), 30).is_january());
    }

    #[test]
    fn test_parse_month_year() {
        let period: MonthYear = "03/2024".parse().unwrap();
        assert_eq!(period, MonthYear { year: 2024, month: 3 });
        assert_eq!(period.to_string(), "03/2024");
    }

    #[test]
    fn test_entry_period() {
        let period = entry(" 11/2023", dec!(1), 30).period().unwrap();
        assert_eq!(period, MonthYear { year: 2023, month: 11 });
        assert!(entry("2023-11", dec!(1), 30).period().is_err());
    }

    #[test]
    fn test_parse_month_year_rejects_garbage() {
        for text in ["13/2024", "00/2024", "3/2024", "03-2024", "03/24", "ab/2024", ""] {
            let err = text.parse::<MonthYear>().unwrap_err();
            assert_eq!(
                err,
                HistoryError::InvalidMonthYear {
                    text: text.to_string()
                }
            );
        }
    }
}
