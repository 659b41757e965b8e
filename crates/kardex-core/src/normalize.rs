//! Movement normalization helpers.
//!
//! Both helpers are total: malformed input falls back to a sensible value
//! instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A voucher identifier split into series and number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoucherCode {
    /// Series (e.g. `F001`), empty when the code has no hyphen.
    pub series: String,
    /// Correlative number.
    pub number: String,
}

/// Split a `series-number` voucher code on its first hyphen.
///
/// Codes without a hyphen are treated as a bare number with an empty series.
///
/// # Examples
///
/// ```
/// use kardex_core::parse_voucher_code;
///
/// let code = parse_voucher_code("F001-000123");
/// assert_eq!((code.series.as_str(), code.number.as_str()), ("F001", "000123"));
///
/// let code = parse_voucher_code("B02-77-A");
/// assert_eq!((code.series.as_str(), code.number.as_str()), ("B02", "77-A"));
///
/// let code = parse_voucher_code("4521");
/// assert_eq!((code.series.as_str(), code.number.as_str()), ("", "4521"));
/// ```
#[must_use]
pub fn parse_voucher_code(code: &str) -> VoucherCode {
    match code.split_once('-') {
        Some((series, number)) => VoucherCode {
            series: series.trim().to_string(),
            number: number.trim().to_string(),
        },
        None => VoucherCode {
            series: String::new(),
            number: code.trim().to_string(),
        },
    }
}

/// Cost of a movement or lot: the stated total when present and nonzero,
/// otherwise `quantity * unit_cost`.
///
/// The product saturates at [`Decimal::MAX`] / [`Decimal::MIN`] instead of
/// overflowing.
///
/// # Examples
///
/// ```
/// use kardex_core::effective_total_cost;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(effective_total_cost(dec!(5), dec!(12), None), dec!(60));
/// assert_eq!(effective_total_cost(dec!(5), dec!(12), Some(dec!(0))), dec!(60));
/// assert_eq!(effective_total_cost(dec!(5), dec!(12), Some(dec!(59.90))), dec!(59.90));
/// ```
#[must_use]
pub fn effective_total_cost(quantity: Decimal, unit_cost: Decimal, stated: Option<Decimal>) -> Decimal {
    match stated {
        Some(total) if !total.is_zero() => total,
        _ => quantity.saturating_mul(unit_cost),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_effective_total_cost_saturates() {
        assert_eq!(effective_total_cost(Decimal::MAX, dec!(2), None), Decimal::MAX);
        assert_eq!(effective_total_cost(Decimal::MAX, dec!(-2), None), Decimal::MIN);
    }

    #[test]
    fn test_parse_empty_code() {
        assert_eq!(parse_voucher_code(""), VoucherCode::default());
        assert_eq!(parse_voucher_code("   "), VoucherCode::default());
    }

    #[test]
    fn test_parse_leading_hyphen() {
        let code = parse_voucher_code("-15");
        assert_eq!(code.series, "");
        assert_eq!(code.number, "15");
    }

    #[test]
    fn test_parse_trailing_hyphen() {
        let code = parse_voucher_code("NC01-");
        assert_eq!(code.series, "NC01");
        assert_eq!(code.number, "");
    }

    #[test]
    fn test_parse_trims_parts() {
        let code = parse_voucher_code(" F001 - 00042 ");
        assert_eq!(code.series, "F001");
        assert_eq!(code.number, "00042");
    }

    #[test]
    fn test_effective_cost_negative_stated() {
        // Credit notes may carry a negative stated total; only zero falls back.
        assert_eq!(
            effective_total_cost(dec!(2), dec!(3), Some(dec!(-6))),
            dec!(-6)
        );
    }

    #[test]
    fn test_effective_cost_zero_quantity() {
        assert_eq!(effective_total_cost(dec!(0), dec!(3), None), dec!(0));
    }

    #[test]
    fn test_effective_cost_keeps_precision() {
        assert_eq!(
            effective_total_cost(dec!(0.333), dec!(1.5), None),
            dec!(0.4995)
        );
    }
}
