//! The residence record filled in by the caller, and its readiness check.
//!
//! The calculation functions never validate their inputs. Callers decide
//! whether derived figures are meaningful by calling
//! [`ResidenceData::check_ready`] first.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cycle::CycleData;

/// Reasons a residence record cannot be analysed yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadinessError {
    /// The previous reading date has not been filled in.
    #[error("previous reading date is missing")]
    MissingPreviousDate,

    /// The current reading date has not been filled in.
    #[error("current reading date is missing")]
    MissingCurrentDate,

    /// The current reading is not after the previous one.
    #[error("current reading date {current} is not after previous reading date {previous}")]
    DatesOutOfOrder {
        /// Previous reading date.
        previous: NaiveDate,
        /// Current reading date.
        current: NaiveDate,
    },

    /// The meter did not advance between readings.
    #[error("current reading {current} is not greater than previous reading {previous}")]
    ReadingsOutOfOrder {
        /// Previous meter reading.
        previous: Decimal,
        /// Current meter reading.
        current: Decimal,
    },
}

/// Account and meter data for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResidenceData {
    /// Account holder name.
    pub user_name: String,
    /// Utility account identifier, opaque to the calculations.
    pub account_id: String,
    /// Date of the previous meter reading.
    pub previous_reading_date: Option<NaiveDate>,
    /// Date of the current meter reading.
    pub current_reading_date: Option<NaiveDate>,
    /// Previous meter reading, in m³.
    pub previous_reading: Decimal,
    /// Current meter reading, in m³.
    pub current_reading: Decimal,
    /// Amount the utility charged.
    pub charged_value: Decimal,
    /// Fixed service fee.
    pub fixed_fee: Decimal,
    /// Whether sewer is billed on top of water.
    pub include_sewer: bool,
}

impl Default for ResidenceData {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            account_id: String::new(),
            previous_reading_date: None,
            current_reading_date: None,
            previous_reading: Decimal::ZERO,
            current_reading: Decimal::ZERO,
            charged_value: Decimal::ZERO,
            fixed_fee: Decimal::new(25, 0),
            include_sewer: true,
        }
    }
}

/// Dates and readings of a residence record that passed the readiness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyReadings {
    /// Date of the previous meter reading.
    pub previous_date: NaiveDate,
    /// Date of the current meter reading.
    pub current_date: NaiveDate,
    /// Previous meter reading.
    pub previous_reading: Decimal,
    /// Current meter reading.
    pub current_reading: Decimal,
}

impl ReadyReadings {
    /// Cycle figures for these readings.
    #[must_use]
    pub fn cycle_data(&self) -> CycleData {
        CycleData::from_dates(
            self.previous_date,
            self.current_date,
            self.previous_reading,
            self.current_reading,
        )
    }
}

impl ResidenceData {
    /// Check that both dates are present and ordered and the meter advanced.
    pub fn check_ready(&self) -> Result<ReadyReadings, ReadinessError> {
        let previous_date = self
            .previous_reading_date
            .ok_or(ReadinessError::MissingPreviousDate)?;
        let current_date = self
            .current_reading_date
            .ok_or(ReadinessError::MissingCurrentDate)?;

        if current_date <= previous_date {
            return Err(ReadinessError::DatesOutOfOrder {
                previous: previous_date,
                current: current_date,
            });
        }
        if self.current_reading <= self.previous_reading {
            return Err(ReadinessError::ReadingsOutOfOrder {
                previous: self.previous_reading,
                current: self.current_reading,
            });
        }

        Ok(ReadyReadings {
            previous_date,
            current_date,
            previous_reading: self.previous_reading,
            current_reading: self.current_reading,
        })
    }

    /// Whether [`check_ready`](Self::check_ready) would succeed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.check_ready().is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn filled() -> ResidenceData {
        ResidenceData {
            user_name: "Maria".to_string(),
            account_id: "123456-7".to_string(),
            previous_reading_date: Some(date(2024, 3, 1)),
            current_reading_date: Some(date(2024, 3, 31)),
            previous_reading: dec!(100),
            current_reading: dec!(130),
            charged_value: dec!(350),
            ..ResidenceData::default()
        }
    }

    #[test]
    fn test_default_matches_blank_form() {
        let data = ResidenceData::default();
        assert_eq!(data.fixed_fee, dec!(25));
        assert!(data.include_sewer);
        assert_eq!(data.previous_reading_date, None);
        assert!(!data.is_ready());
    }

    #[test]
    fn test_ready() {
        let ready = filled().check_ready().unwrap();
        assert_eq!(ready.previous_reading, dec!(100));
        let cycle = ready.cycle_data();
        assert_eq!(cycle.cycle_days, 30);
        assert_eq!(cycle.consumption, dec!(30));
    }

    #[test]
    fn test_missing_dates() {
        let mut data = filled();
        data.current_reading_date = None;
        assert_eq!(data.check_ready(), Err(ReadinessError::MissingCurrentDate));
        data.previous_reading_date = None;
        assert_eq!(data.check_ready(), Err(ReadinessError::MissingPreviousDate));
    }

    #[test]
    fn test_dates_out_of_order() {
        let mut data = filled();
        data.current_reading_date = Some(date(2024, 3, 1));
        assert!(matches!(
            data.check_ready(),
            Err(ReadinessError::DatesOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_meter_must_advance() {
        let mut data = filled();
        data.current_reading = dec!(100);
        let err = data.check_ready().unwrap_err();
        assert_eq!(
            err.to_string(),
            "current reading 100 is not greater than previous reading 100"
        );
    }

    #[test]
    fn test_deserialize_partial_form() {
        let data: ResidenceData = serde_json::from_str(
            r#"{"user_name": "João", "previous_reading_date": "2024-03-01", "previous_reading": "100.5"}"#,
        )
        .unwrap();
        assert_eq!(data.user_name, "João");
        assert_eq!(data.previous_reading_date, Some(date(2024, 3, 1)));
        assert_eq!(data.previous_reading, dec!(100.5));
        assert_eq!(data.fixed_fee, dec!(25));
        assert_eq!(data.current_reading_date, None);
    }
}
