//! Consumption classification against the historical baseline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest deviation, in percent, still considered normal.
pub const NORMAL_LIMIT_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Highest deviation, in percent, considered elevated rather than anomalous.
pub const ELEVATED_LIMIT_PERCENT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Severity bucket of a consumption deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Within 20% above the baseline, or anywhere below it.
    Normal,
    /// More than 20% and at most 50% above the baseline.
    Elevated,
    /// More than 50% above the baseline.
    Anomalous,
}

impl Classification {
    /// Bucket a signed deviation percentage.
    ///
    /// The cutoffs apply to the signed value, so large drops in usage stay
    /// `Normal`.
    #[must_use]
    pub fn from_deviation_percent(percent: Decimal) -> Self {
        if percent <= NORMAL_LIMIT_PERCENT {
            Self::Normal
        } else if percent <= ELEVATED_LIMIT_PERCENT {
            Self::Elevated
        } else {
            Self::Anomalous
        }
    }

    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Elevated => "elevated",
            Self::Anomalous => "anomalous",
        }
    }

    /// Label shown in pt-BR reports.
    #[must_use]
    pub const fn localized_label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Elevated => "Elevado",
            Self::Anomalous => "Anômalo",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Deviation of a normalized consumption from the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionClassification {
    /// The severity bucket.
    pub classification: Classification,
    /// `normalized - average`, in m³.
    pub deviation: Decimal,
    /// Deviation relative to the average, zero without a positive average.
    pub deviation_percent: Decimal,
}

/// `part / whole * 100`, saturating when the result leaves the range of
/// [`Decimal`]. Callers guard against a non-positive `whole`.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole).map_or_else(
        || {
            if part.is_sign_negative() == whole.is_sign_negative() {
                Decimal::MAX
            } else {
                Decimal::MIN
            }
        },
        |ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED),
    )
}

/// Classify a normalized consumption against a historical monthly average.
///
/// A zero average gives a zero percent and therefore `Normal`; check that a
/// baseline exists before relying on the result.
#[must_use]
pub fn classify_consumption(
    normalized_consumption: Decimal,
    historical_average: Decimal,
) -> ConsumptionClassification {
    let deviation = normalized_consumption.saturating_sub(historical_average);
    let deviation_percent = if historical_average > Decimal::ZERO {
        percent_of(deviation, historical_average)
    } else {
        Decimal::ZERO
    };

    ConsumptionClassification {
        classification: Classification::from_deviation_percent(deviation_percent),
        deviation,
        deviation_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_localized_label() {
        assert_eq!(Classification::Elevated.localized_label(), "Elevado");
        assert_eq!(Classification::Anomalous.localized_label(), "Anômalo");
    }

    #[test]
    fn test_extreme_deviation_saturates() {
        let result = classify_consumption(Decimal::MAX, dec!(0.0001));
        assert_eq!(result.deviation_percent, Decimal::MAX);
        assert_eq!(result.classification, Classification::Anomalous);

        assert_eq!(percent_of(Decimal::MIN, dec!(0.5)), Decimal::MIN);
        assert_eq!(percent_of(dec!(1), dec!(4)), dec!(25));
    }

    #[test]
    fn test_normal_boundary_inclusive() {
        let result = classify_consumption(dec!(24), dec!(20));
        assert_eq!(result.deviation, dec!(4));
        assert_eq!(result.deviation_percent, dec!(20));
        assert_eq!(result.classification, Classification::Normal);
    }

    #[test]
    fn test_just_over_normal_is_elevated() {
        assert_eq!(
            Classification::from_deviation_percent(dec!(20.01)),
            Classification::Elevated
        );
        let result = classify_consumption(dec!(24.002), dec!(20));
        assert_eq!(result.deviation_percent, dec!(20.01));
        assert_eq!(result.classification, Classification::Elevated);
    }

    #[test]
    fn test_elevated_boundary_inclusive() {
        let result = classify_consumption(dec!(30), dec!(20));
        assert_eq!(result.deviation_percent, dec!(50));
        assert_eq!(result.classification, Classification::Elevated);
    }

    #[test]
    fn test_anomalous() {
        let result = classify_consumption(dec!(31), dec!(20));
        assert_eq!(result.deviation_percent, dec!(55));
        assert_eq!(result.classification, Classification::Anomalous);
    }

    #[test]
    fn test_large_drop_stays_normal() {
        let result = classify_consumption(dec!(5), dec!(20));
        assert_eq!(result.deviation, dec!(-15));
        assert_eq!(result.deviation_percent, dec!(-75));
        assert_eq!(result.classification, Classification::Normal);
    }

    #[test]
    fn test_zero_average_is_degenerate() {
        let result = classify_consumption(dec!(50), Decimal::ZERO);
        assert_eq!(result.deviation, dec!(50));
        assert_eq!(result.deviation_percent, Decimal::ZERO);
        assert_eq!(result.classification, Classification::Normal);
    }

    #[test]
    fn test_serializes_lowercase() {
        let json = serde_json::to_string(&Classification::Anomalous).unwrap();
        assert_eq!(json, "\"anomalous\"");
    }
}
