//! Common utility functions for estimate calculations.
//!
//! This module provides shared functionality used across the works,
//! line-item and export calculations: rounding, clamping and the Russian
//! money format used on every document.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pool_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole roubles, half away from zero.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a work quantity up to one decimal place.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pool_core::calculations::common::round_quantity_up;
///
/// assert_eq!(round_quantity_up(dec!(53.01)), dec!(53.1));
/// assert_eq!(round_quantity_up(dec!(53.1)), dec!(53.1));
/// ```
pub fn round_quantity_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::ToPositiveInfinity)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pool_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats an amount the way Russian documents print money: thousands
/// separated by spaces, a decimal comma, trailing zeros dropped.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pool_core::calculations::common::format_rub;
///
/// assert_eq!(format_rub(dec!(1234567)), "1 234 567");
/// assert_eq!(format_rub(dec!(1500.50)), "1 500,5");
/// ```
pub fn format_rub(value: Decimal) -> String {
    let rounded = round_half_up(value).normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // rounding tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    #[test]
    fn round_whole_rounds_half_up() {
        assert_eq!(round_whole(dec!(2500.5)), dec!(2501));
        assert_eq!(round_whole(dec!(2500.49)), dec!(2500));
    }

    #[test]
    fn round_quantity_up_always_rounds_up() {
        assert_eq!(round_quantity_up(dec!(0.01)), dec!(0.1));
        assert_eq!(round_quantity_up(dec!(12.0)), dec!(12.0));
        assert_eq!(round_quantity_up(dec!(3.84)), dec!(3.9));
    }

    #[test]
    fn max_handles_equal_values() {
        assert_eq!(max(dec!(150.00), dec!(150.00)), dec!(150.00));
    }

    // =========================================================================
    // format_rub tests
    // =========================================================================

    #[test]
    fn format_rub_groups_thousands() {
        assert_eq!(format_rub(dec!(0)), "0");
        assert_eq!(format_rub(dec!(999)), "999");
        assert_eq!(format_rub(dec!(1000)), "1 000");
        assert_eq!(format_rub(dec!(2450000.00)), "2 450 000");
    }

    #[test]
    fn format_rub_keeps_significant_kopecks() {
        assert_eq!(format_rub(dec!(1234.05)), "1 234,05");
        assert_eq!(format_rub(dec!(0.125)), "0,13");
    }

    #[test]
    fn format_rub_handles_negative_values() {
        assert_eq!(format_rub(dec!(-15000)), "-15 000");
    }
}
