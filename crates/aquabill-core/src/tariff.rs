//! Progressive water tariff table.
//!
//! The table is compile-time data: consumption is billed cumulatively, the
//! first band at the lowest price, the next band at the second price, and so
//! on until the open-ended last band. Changing tariffs means rebuilding.
//!
//! A band covers every whole cubic metre from its lower to its upper bound
//! inclusive. The first band starts at zero, so it absorbs 11 m³ and every
//! later bounded band absorbs 10 m³. Bills issued from this table have always
//! been computed that way.

use rust_decimal::Decimal;
use serde::Serialize;

/// One consumption band of the progressive tariff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TariffBand {
    /// First whole cubic metre billed in this band.
    pub lower_bound: u32,
    /// Last whole cubic metre billed in this band, `None` for the open-ended band.
    pub upper_bound: Option<u32>,
    /// Price per cubic metre.
    pub unit_price: Decimal,
    /// Human-readable range label.
    pub label: &'static str,
}

const fn price(cents: u32) -> Decimal {
    Decimal::from_parts(cents, 0, 0, false, 2)
}

/// The tariff in effect, ordered by ascending bound.
pub static TARIFF_TABLE: [TariffBand; 7] = [
    TariffBand {
        lower_bound: 0,
        upper_bound: Some(10),
        unit_price: price(241),
        label: "Até 10 m³",
    },
    TariffBand {
        lower_bound: 11,
        upper_bound: Some(20),
        unit_price: price(605),
        label: "11–20 m³",
    },
    TariffBand {
        lower_bound: 21,
        upper_bound: Some(30),
        unit_price: price(777),
        label: "21–30 m³",
    },
    TariffBand {
        lower_bound: 31,
        upper_bound: Some(40),
        unit_price: price(981),
        label: "31–40 m³",
    },
    TariffBand {
        lower_bound: 41,
        upper_bound: Some(50),
        unit_price: price(1165),
        label: "41–50 m³",
    },
    TariffBand {
        lower_bound: 51,
        upper_bound: Some(60),
        unit_price: price(1278),
        label: "51–60 m³",
    },
    TariffBand {
        lower_bound: 61,
        upper_bound: None,
        unit_price: price(1416),
        label: "61+ m³",
    },
];

/// The tariff table as a slice.
#[must_use]
pub fn tariff_table() -> &'static [TariffBand] {
    &TARIFF_TABLE
}

impl TariffBand {
    /// Volume already billed by the bands below this one.
    #[must_use]
    pub fn floor(&self) -> Decimal {
        Decimal::from(self.lower_bound)
    }

    /// Volume this band can absorb, `None` when unbounded.
    ///
    /// Both bounds are inclusive: `upper - lower + 1`.
    #[must_use]
    pub fn capacity(&self) -> Option<Decimal> {
        self.upper_bound
            .map(|upper| Decimal::from(upper) - self.floor() + Decimal::ONE)
    }

    /// Whether this is the open-ended last band.
    #[must_use]
    pub const fn is_open_ended(&self) -> bool {
        self.upper_bound.is_none()
    }
}
