//! Bill calculation over the progressive tariff.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tariff::TARIFF_TABLE;

/// Volume billed within a single tariff band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TariffBreakdown {
    /// Label of the band the volume fell into.
    pub range_label: String,
    /// Cubic metres billed in this band.
    pub volume_in_band: Decimal,
    /// Price per cubic metre in this band.
    pub unit_price: Decimal,
    /// `volume_in_band * unit_price`.
    pub subtotal: Decimal,
}

/// A computed water bill.
///
/// `total = water_value + sewer_value + fixed_fee`, and the breakdown
/// subtotals sum to `water_value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterBillResult {
    /// Water charge from the progressive tariff.
    pub water_value: Decimal,
    /// Sewer charge, equal to the water charge when sewer is billed.
    pub sewer_value: Decimal,
    /// Fixed service fee.
    pub fixed_fee: Decimal,
    /// Grand total.
    pub total: Decimal,
    /// Per-band breakdown in ascending band order.
    pub breakdown: Vec<TariffBreakdown>,
}

impl WaterBillResult {
    /// Total without any sewer charge.
    #[must_use]
    pub fn total_without_sewer(&self) -> Decimal {
        self.water_value.saturating_add(self.fixed_fee)
    }

    /// Total with the sewer charge applied, whatever the bill was computed with.
    #[must_use]
    pub fn total_with_sewer(&self) -> Decimal {
        self.water_value
            .saturating_add(self.water_value)
            .saturating_add(self.fixed_fee)
    }

    /// Total volume covered by the breakdown.
    #[must_use]
    pub fn billed_volume(&self) -> Decimal {
        self.breakdown
            .iter()
            .fold(Decimal::ZERO, |total, b| total.saturating_add(b.volume_in_band))
    }
}

/// Bill a normalized monthly consumption against the tariff table.
///
/// Bands are walked in ascending order, each absorbing as much of the
/// remaining volume as its capacity allows. Bands that receive no volume are
/// left out of the breakdown. Negative consumption is not a defined input and
/// yields an empty breakdown. Amounts beyond the range of [`Decimal`] saturate
/// at [`Decimal::MAX`].
///
/// # Example
///
/// ```
/// use aquabill_core::calculate_water_bill;
/// use rust_decimal_macros::dec;
///
/// let bill = calculate_water_bill(dec!(15), false, dec!(25));
/// assert_eq!(bill.breakdown.len(), 2);
/// assert_eq!(bill.water_value, dec!(50.71)); // 11 * 2.41 + 4 * 6.05
/// assert_eq!(bill.total, dec!(75.71));
/// ```
#[must_use]
pub fn calculate_water_bill(
    normalized_consumption: Decimal,
    include_sewer: bool,
    fixed_fee: Decimal,
) -> WaterBillResult {
    let mut remaining = normalized_consumption;
    let mut water_value = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for band in &TARIFF_TABLE {
        if remaining <= Decimal::ZERO {
            break;
        }

        let volume = match band.capacity() {
            Some(capacity) => remaining.min(capacity),
            None => remaining,
        };
        let subtotal = volume.saturating_mul(band.unit_price);

        breakdown.push(TariffBreakdown {
            range_label: band.label.to_string(),
            volume_in_band: volume,
            unit_price: band.unit_price,
            subtotal,
        });
        water_value = water_value.saturating_add(subtotal);
        remaining -= volume;
    }

    let sewer_value = if include_sewer {
        water_value
    } else {
        Decimal::ZERO
    };

    WaterBillResult {
        water_value,
        sewer_value,
        fixed_fee,
        total: water_value
            .saturating_add(sewer_value)
            .saturating_add(fixed_fee),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_consumption_carries_fee_only() {
        let bill = calculate_water_bill(Decimal::ZERO, true, dec!(25));
        assert!(bill.breakdown.is_empty());
        assert_eq!(bill.water_value, Decimal::ZERO);
        assert_eq!(bill.sewer_value, Decimal::ZERO);
        assert_eq!(bill.total, dec!(25));
    }

    #[test]
    fn test_single_band() {
        let bill = calculate_water_bill(dec!(7.5), false, Decimal::ZERO);
        assert_eq!(bill.breakdown.len(), 1);
        assert_eq!(bill.breakdown[0].range_label, "Até 10 m³");
        assert_eq!(bill.breakdown[0].volume_in_band, dec!(7.5));
        assert_eq!(bill.water_value, dec!(18.075));
    }

    #[test]
    fn test_thirty_cubic_metres_fill_three_bands() {
        let bill = calculate_water_bill(dec!(30), true, dec!(25));
        let volumes: Vec<_> = bill.breakdown.iter().map(|b| b.volume_in_band).collect();
        assert_eq!(volumes, vec![dec!(11), dec!(10), dec!(9)]);
        // 26.51 + 60.50 + 69.93
        assert_eq!(bill.water_value, dec!(156.94));
        assert_eq!(bill.sewer_value, bill.water_value);
        assert_eq!(bill.total, dec!(338.88));
    }

    #[test]
    fn test_eleven_cubic_metres_stay_in_first_band() {
        let bill = calculate_water_bill(dec!(11), false, Decimal::ZERO);
        assert_eq!(bill.breakdown.len(), 1);
        assert_eq!(bill.breakdown[0].volume_in_band, dec!(11));
        assert_eq!(bill.water_value, dec!(26.51));

        let next = calculate_water_bill(dec!(11.5), false, Decimal::ZERO);
        assert_eq!(next.breakdown.len(), 2);
        assert_eq!(next.breakdown[1].volume_in_band, dec!(0.5));
    }

    #[test]
    fn test_open_ended_band_absorbs_remainder() {
        let bill = calculate_water_bill(dec!(100), false, Decimal::ZERO);
        assert_eq!(bill.breakdown.len(), 7);
        let last = bill.breakdown.last().unwrap();
        assert_eq!(last.range_label, "61+ m³");
        assert_eq!(last.volume_in_band, dec!(39));
        assert_eq!(bill.billed_volume(), dec!(100));
    }

    #[test]
    fn test_huge_volume_saturates() {
        let bill = calculate_water_bill(Decimal::MAX, true, dec!(25));
        assert_eq!(bill.water_value, Decimal::MAX);
        assert_eq!(bill.total, Decimal::MAX);
        assert_eq!(bill.total_without_sewer(), Decimal::MAX);
        assert_eq!(bill.breakdown.last().unwrap().subtotal, Decimal::MAX);
    }

    #[test]
    fn test_sewer_flag() {
        let with = calculate_water_bill(dec!(12), true, dec!(10));
        let without = calculate_water_bill(dec!(12), false, dec!(10));
        assert_eq!(with.water_value, without.water_value);
        assert_eq!(without.sewer_value, Decimal::ZERO);
        assert_eq!(with.total, without.total + with.water_value);
        assert_eq!(without.total_with_sewer(), with.total);
        assert_eq!(with.total_without_sewer(), without.total);
    }

    #[test]
    fn test_subtotals_sum_to_water_value() {
        let bill = calculate_water_bill(dec!(47.3), false, Decimal::ZERO);
        let sum: Decimal = bill.breakdown.iter().map(|b| b.subtotal).sum();
        assert_eq!(sum, bill.water_value);
    }

    #[test]
    fn test_negative_consumption_is_empty() {
        let bill = calculate_water_bill(dec!(-5), true, dec!(25));
        assert!(bill.breakdown.is_empty());
        assert_eq!(bill.total, dec!(25));
    }
}
