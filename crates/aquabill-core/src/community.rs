//! Neighbourhood comparison of charged and technically calculated bills.
//!
//! Residents pool the amount each was charged next to the amount the tariff
//! says they should have paid. The aggregate shows whether over-billing is
//! systematic across the neighbourhood.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analysis::Analysis;
use crate::classify::percent_of;

/// One residence in a neighbourhood comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityEntry {
    /// Identifier of the entry.
    #[serde(default)]
    pub id: String,
    /// Resident or address label.
    pub name: String,
    /// Amount the utility charged.
    pub charged_value: Decimal,
    /// Amount calculated from the tariff.
    pub technical_value: Decimal,
    /// Monthly consumption, in m³.
    pub consumption: Decimal,
}

impl CommunityEntry {
    /// Build an entry from a finished analysis, using its normalized
    /// consumption and calculated total.
    #[must_use]
    pub fn from_analysis(analysis: &Analysis) -> Self {
        let residence = &analysis.residence;
        Self {
            id: residence.account_id.clone(),
            name: residence.user_name.clone(),
            charged_value: residence.charged_value,
            technical_value: analysis.bill.total,
            consumption: analysis.cycle.normalized_consumption,
        }
    }

    /// `charged - technical`; positive means overcharged.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.charged_value.saturating_sub(self.technical_value)
    }

    /// Difference relative to the technical value, `None` when that value is
    /// not positive.
    #[must_use]
    pub fn distortion_percent(&self) -> Option<Decimal> {
        (self.technical_value > Decimal::ZERO)
            .then(|| percent_of(self.difference(), self.technical_value))
    }
}

/// Aggregate figures over a neighbourhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityStats {
    /// Number of residences.
    pub total_residences: usize,
    /// Mean consumption, in m³.
    pub average_consumption: Decimal,
    /// Mean charged amount.
    pub average_charged_value: Decimal,
    /// Mean calculated amount.
    pub average_technical_value: Decimal,
    /// Sum of all differences.
    pub total_difference: Decimal,
    /// Mean difference.
    pub average_difference: Decimal,
    /// Mean distortion over residences with a positive technical value.
    pub average_distortion_percent: Decimal,
    /// Residences that contributed to the distortion mean.
    pub distortion_sample_count: usize,
}

fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
    values.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Aggregate a neighbourhood, `None` when it is empty.
///
/// Entries whose technical value is not positive are left out of the
/// distortion mean only; every other figure covers all entries.
///
/// # Example
///
/// ```
/// use aquabill_core::{community_stats, CommunityEntry};
/// use rust_decimal_macros::dec;
///
/// let entry = |name: &str, charged, technical| CommunityEntry {
///     id: String::new(),
///     name: name.to_string(),
///     charged_value: charged,
///     technical_value: technical,
///     consumption: dec!(20),
/// };
/// let entries = vec![entry("A", dec!(120), dec!(100)), entry("B", dec!(90), dec!(100))];
///
/// let stats = community_stats(&entries).unwrap();
/// assert_eq!(stats.total_difference, dec!(10));
/// assert_eq!(stats.average_distortion_percent, dec!(5));
/// ```
#[must_use]
pub fn community_stats(entries: &[CommunityEntry]) -> Option<CommunityStats> {
    if entries.is_empty() {
        return None;
    }
    let count = entries.len();

    let distortions: Vec<Decimal> = entries
        .iter()
        .filter_map(CommunityEntry::distortion_percent)
        .collect();
    let total_difference = sum(entries.iter().map(CommunityEntry::difference));

    Some(CommunityStats {
        total_residences: count,
        average_consumption: mean(sum(entries.iter().map(|e| e.consumption)), count),
        average_charged_value: mean(sum(entries.iter().map(|e| e.charged_value)), count),
        average_technical_value: mean(sum(entries.iter().map(|e| e.technical_value)), count),
        total_difference,
        average_difference: mean(total_difference, count),
        average_distortion_percent: mean(sum(distortions.iter().copied()), distortions.len()),
        distortion_sample_count: distortions.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(
        name: &str,
        charged: Decimal,
        technical: Decimal,
        consumption: Decimal,
    ) -> CommunityEntry {
        CommunityEntry {
            id: name.to_lowercase(),
            name: name.to_string(),
            charged_value: charged,
            technical_value: technical,
            consumption,
        }
    }

    #[test]
    fn test_empty_has_no_stats() {
        assert_eq!(community_stats(&[]), None);
    }

    #[test]
    fn test_averages() {
        let entries = vec![
            entry("Rua A, 10", dec!(150), dec!(100), dec!(18)),
            entry("Rua A, 12", dec!(200), dec!(160), dec!(24)),
            entry("Rua B, 3", dec!(100), dec!(100), dec!(12)),
        ];
        let stats = community_stats(&entries).unwrap();

        assert_eq!(stats.total_residences, 3);
        assert_eq!(stats.average_consumption, dec!(18));
        assert_eq!(stats.average_charged_value, dec!(150));
        assert_eq!(stats.average_technical_value, dec!(120));
        assert_eq!(stats.total_difference, dec!(90));
        assert_eq!(stats.average_difference, dec!(30));
        // (50 + 25 + 0) / 3
        assert_eq!(stats.average_distortion_percent, dec!(25));
        assert_eq!(stats.distortion_sample_count, 3);
    }

    #[test]
    fn test_zero_technical_value_left_out_of_distortion() {
        let entries = vec![
            entry("A", dec!(120), dec!(100), dec!(10)),
            entry("B", dec!(50), Decimal::ZERO, dec!(10)),
        ];
        assert_eq!(entries[1].distortion_percent(), None);

        let stats = community_stats(&entries).unwrap();
        assert_eq!(stats.average_distortion_percent, dec!(20));
        assert_eq!(stats.distortion_sample_count, 1);
        assert_eq!(stats.total_difference, dec!(70));
        assert_eq!(stats.average_technical_value, dec!(50));
    }

    #[test]
    fn test_undercharged_neighbourhood_is_negative() {
        let entries = vec![entry("A", dec!(80), dec!(100), dec!(10))];
        let stats = community_stats(&entries).unwrap();
        assert_eq!(stats.total_difference, dec!(-20));
        assert_eq!(stats.average_distortion_percent, dec!(-20));
    }

    #[test]
    fn test_extreme_values_saturate() {
        let entries = vec![
            entry("A", Decimal::MAX, dec!(0.5), Decimal::MAX),
            entry("B", Decimal::MAX, dec!(0.5), Decimal::MAX),
        ];
        let stats = community_stats(&entries).unwrap();
        assert_eq!(stats.total_difference, Decimal::MAX);
        assert_eq!(stats.average_distortion_percent, Decimal::MAX / dec!(2));
    }

    #[test]
    fn test_deserialize_without_id() {
        let entry: CommunityEntry = serde_json::from_str(
            r#"{"name": "Casa 4", "charged_value": "210.40", "technical_value": "180", "consumption": "22"}"#,
        )
        .unwrap();
        assert_eq!(entry.id, "");
        assert_eq!(entry.difference(), dec!(30.40));
    }
}
