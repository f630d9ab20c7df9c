//! Water bill analysis for aquabill
//!
//! This crate holds the pure calculations behind a residential water bill
//! check:
//!
//! - [`TARIFF_TABLE`] - The progressive tariff bands
//! - [`calculate_water_bill`] - Bill a normalized volume against the tariff
//! - [`calculate_cycle_data`] - Normalize a reading cycle to 30 days
//! - [`calculate_historical_average`] - Baseline from past billing periods
//! - [`classify_consumption`] - Bucket the deviation from the baseline
//! - [`generate_diagnosis`] - Human-readable findings
//! - [`format_currency`] / [`format_number`] - pt-BR rendering
//! - [`analyze`] - All of the above for one [`ResidenceData`]
//! - [`generate_synthesis`] - Narrative report of an [`Analysis`]
//! - [`community_stats`] - Neighbourhood comparison of charged and calculated bills
//!
//! Every function is synchronous and side-effect free; independent analyses
//! can run concurrently without coordination.
//!
//! # Example
//!
//! ```
//! use aquabill_core::{analyze, AnalysisOptions, HistoricalEntry, NaiveDate, ResidenceData};
//! use rust_decimal_macros::dec;
//!
//! let residence = ResidenceData {
//!     previous_reading_date: NaiveDate::from_ymd_opt(2024, 3, 1),
//!     current_reading_date: NaiveDate::from_ymd_opt(2024, 3, 31),
//!     previous_reading: dec!(100),
//!     current_reading: dec!(130),
//!     charged_value: dec!(338.88),
//!     ..ResidenceData::default()
//! };
//! let history = vec![HistoricalEntry::new("1", "02/2024", dec!(28), 30)];
//!
//! let analysis = analyze(&residence, &history, &AnalysisOptions::default()).unwrap();
//! assert_eq!(analysis.cycle.normalized_consumption, dec!(30));
//! assert_eq!(analysis.bill.total, dec!(338.88));
//! assert_eq!(analysis.comparison.volume_anomaly, Some(dec!(2)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod bill;
pub mod classify;
pub mod community;
pub mod comparison;
pub mod cycle;
pub mod diagnosis;
pub mod format;
pub mod history;
pub mod residence;
pub mod synthesis;
pub mod tariff;

pub use analysis::{analyze, Analysis, AnalysisOptions};
pub use bill::{calculate_water_bill, TariffBreakdown, WaterBillResult};
pub use classify::{
    classify_consumption, Classification, ConsumptionClassification, ELEVATED_LIMIT_PERCENT,
    NORMAL_LIMIT_PERCENT,
};
pub use community::{community_stats, CommunityEntry, CommunityStats};
pub use comparison::{compare_bill, BillComparison};
pub use cycle::{calculate_cycle_data, cycle_days_between, CycleData, NORMALIZED_DAYS};
pub use diagnosis::{generate_diagnosis, DiagnosisItem, Severity};
pub use format::{format_currency, format_number};
pub use history::{
    calculate_historical_average, january_entries, HistoricalAverage, HistoricalEntry,
    HistoryError, MonthYear,
};
pub use residence::{ReadinessError, ReadyReadings, ResidenceData};
pub use synthesis::{generate_synthesis, SYNTHESIS_TITLE};
pub use tariff::{tariff_table, TariffBand, TARIFF_TABLE};

// Re-export commonly used external types
pub use chrono::NaiveDate;
pub use rust_decimal::Decimal;
