//! Brazilian Portuguese number and currency rendering.

use rust_decimal::{Decimal, RoundingStrategy};

const CURRENCY_SYMBOL: &str = "R$";
const DECIMAL_SEPARATOR: char = ',';
const GROUP_SEPARATOR: char = '.';
// Intl places a no-break space between the symbol and the amount.
const SYMBOL_SPACE: char = '\u{a0}';

/// Round to `decimals` places, half away from zero, with exactly that many
/// places kept. Negative zero collapses to zero.
fn fixed(value: Decimal, decimals: u32) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(decimals);
    rounded
}

/// Render a number with a fixed count of decimals and a comma separator.
///
/// ```
/// use aquabill_core::format_number;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_number(dec!(33.333), 1), "33,3");
/// assert_eq!(format_number(dec!(1234.5), 2), "1234,50");
/// ```
#[must_use]
pub fn format_number(value: Decimal, decimals: u32) -> String {
    fixed(value, decimals)
        .to_string()
        .replace('.', &DECIMAL_SEPARATOR.to_string())
}

/// Render a value as Brazilian reais.
///
/// ```
/// use aquabill_core::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.5)), "R$\u{a0}1.234,50");
/// assert_eq!(format_currency(dec!(-50)), "-R$\u{a0}50,00");
/// ```
#[must_use]
pub fn format_currency(value: Decimal) -> String {
    let rounded = fixed(value, 2);
    let digits = rounded.abs().to_string();
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut out = String::with_capacity(digits.len() + 8);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(CURRENCY_SYMBOL);
    out.push(SYMBOL_SPACE);
    out.push_str(&group_thousands(integer));
    out.push(DECIMAL_SEPARATOR);
    out.push_str(fraction);
    out
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_number_pads_decimals() {
        assert_eq!(format_number(dec!(10), 2), "10,00");
        assert_eq!(format_number(dec!(0.5), 1), "0,5");
        assert_eq!(format_number(dec!(7), 0), "7");
    }

    #[test]
    fn test_format_number_rounds_half_away_from_zero() {
        assert_eq!(format_number(dec!(2.25), 1), "2,3");
        assert_eq!(format_number(dec!(-2.25), 1), "-2,3");
        assert_eq!(format_number(dec!(1.004), 2), "1,00");
    }

    #[test]
    fn test_format_number_negative_zero() {
        assert_eq!(format_number(dec!(-0.001), 2), "0,00");
    }

    #[test]
    fn test_format_number_long_fraction() {
        // 100 / 3 carries 28 significant digits
        let third = dec!(100) / dec!(3);
        assert_eq!(format_number(third, 1), "33,3");
    }

    #[test]
    fn test_format_currency_grouping() {
        assert_eq!(format_currency(dec!(0)), "R$\u{a0}0,00");
        assert_eq!(format_currency(dec!(999.999)), "R$\u{a0}1.000,00");
        assert_eq!(format_currency(dec!(1234567.891)), "R$\u{a0}1.234.567,89");
        assert_eq!(format_currency(dec!(100)), "R$\u{a0}100,00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.5)), "-R$\u{a0}1.234,50");
        assert_eq!(format_currency(dec!(-0.001)), "R$\u{a0}0,00");
    }
}
