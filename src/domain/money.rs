//! Monetary amounts.

use rust_decimal::{Decimal, RoundingStrategy};

/// Token amount represented as a Decimal for precision.
pub type Amount = Decimal;

/// Render an amount the way the exchange expects it on the wire.
///
/// Always a plain decimal string: no exponent, no trailing zeros.
#[must_use]
pub fn to_wire(amount: Amount) -> String {
    amount.normalize().to_string()
}

/// Truncate an amount to `dp` decimal places, never rounding up.
#[must_use]
pub fn round_down(amount: Amount, dp: u32) -> Amount {
    amount.round_dp_with_strategy(dp, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn wire_format_strips_trailing_zeros() {
        assert_eq!(to_wire(dec!(2.500)), "2.5");
        assert_eq!(to_wire(dec!(0.0010)), "0.001");
        assert_eq!(to_wire(dec!(10)), "10");
    }

    #[test]
    fn wire_format_never_uses_exponent() {
        assert_eq!(to_wire(dec!(0.00000001)), "0.00000001");
    }

    #[test]
    fn round_down_truncates() {
        assert_eq!(round_down(dec!(0.0123456789), 6), dec!(0.012345));
        assert_eq!(round_down(dec!(1.9999999), 6), dec!(1.999999));
    }
}
