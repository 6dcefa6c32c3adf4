//! Money formatting helpers.
//!
//! All monetary amounts in FutStore are `rust_decimal::Decimal` values with
//! two fraction digits. Arithmetic on them is exact; this module only deals
//! with presentation.

use rust_decimal::Decimal;

/// Format an amount as Brazilian reais, e.g. `R$ 199,90`.
///
/// The amount is rounded to two decimal places (banker's rounding) before
/// formatting. The decimal separator is a comma, per pt-BR convention.
#[must_use]
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    format!("R$ {:.2}", rounded).replace('.', ",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(Decimal::new(19990, 2)), "R$ 199,90");
        assert_eq!(format_brl(Decimal::new(2990, 2)), "R$ 29,90");
        assert_eq!(format_brl(Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_pads_fraction_digits() {
        // 399.8 must render with both cents digits
        assert_eq!(format_brl(Decimal::new(3998, 1)), "R$ 399,80");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(Decimal::new(19999, 3)), "R$ 20,00");
    }
}
