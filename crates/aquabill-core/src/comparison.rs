//! Charged versus calculated bill.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::bill::WaterBillResult;
use crate::classify::percent_of;

/// How the charged amount and consumption compare with the calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillComparison {
    /// `charged - calculated total`; positive means overcharged.
    pub difference_absolute: Decimal,
    /// Difference relative to the calculated total, zero when the total is not positive.
    pub difference_percent: Decimal,
    /// Normalized consumption above the baseline, `None` without a baseline.
    pub volume_anomaly: Option<Decimal>,
}

/// Compare a charged amount with a calculated bill.
#[must_use]
pub fn compare_bill(
    charged_value: Decimal,
    bill: &WaterBillResult,
    normalized_consumption: Decimal,
    historical_average: Decimal,
) -> BillComparison {
    let difference_absolute = charged_value.saturating_sub(bill.total);
    let difference_percent = if bill.total > Decimal::ZERO {
        percent_of(difference_absolute, bill.total)
    } else {
        Decimal::ZERO
    };
    let volume_anomaly = (historical_average > Decimal::ZERO)
        .then(|| normalized_consumption.saturating_sub(historical_average));

    BillComparison {
        difference_absolute,
        difference_percent,
        volume_anomaly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::calculate_water_bill;
    use rust_decimal_macros::dec;

    #[test]
    fn test_overcharged() {
        let bill = calculate_water_bill(dec!(10), false, dec!(25.90)); // 24.10 + 25.90
        assert_eq!(bill.total, dec!(50));
        let cmp = compare_bill(dec!(60), &bill, dec!(10), dec!(8));
        assert_eq!(cmp.difference_absolute, dec!(10));
        assert_eq!(cmp.difference_percent, dec!(20));
        assert_eq!(cmp.volume_anomaly, Some(dec!(2)));
    }

    #[test]
    fn test_saturated_bill_does_not_overflow() {
        let bill = calculate_water_bill(Decimal::MAX, true, dec!(25));
        let cmp = compare_bill(Decimal::MIN, &bill, Decimal::MAX, dec!(1));
        assert_eq!(cmp.difference_absolute, Decimal::MIN);
        assert_eq!(cmp.difference_percent, dec!(-100));
        assert_eq!(cmp.volume_anomaly, Some(Decimal::MAX - dec!(1)));
    }

    #[test]
    fn test_no_baseline_no_anomaly() {
        let bill = calculate_water_bill(dec!(10), false, dec!(0));
        let cmp = compare_bill(dec!(20), &bill, dec!(10), Decimal::ZERO);
        assert_eq!(cmp.volume_anomaly, None);
    }

    #[test]
    fn test_zero_total_percent_guarded() {
        let bill = calculate_water_bill(Decimal::ZERO, false, Decimal::ZERO);
        let cmp = compare_bill(dec!(15), &bill, Decimal::ZERO, dec!(10));
        assert_eq!(cmp.difference_absolute, dec!(15));
        assert_eq!(cmp.difference_percent, Decimal::ZERO);
        assert_eq!(cmp.volume_anomaly, Some(dec!(-10)));
    }
}
