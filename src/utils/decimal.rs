//! Fixed-point decimal helpers.
//!
//! Monetary and percentage values are carried as [`BigDecimal`] built from
//! scaled integers, so no floating-point rounding leaks into stored rows.
//! They only become strings at the JSON boundary.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use std::str::FromStr;

// ============================================
// Scales
// ============================================

/// Scale for USD amounts (volume, TVL, flows): cents.
pub const AMOUNT_SCALE: i64 = 2;

/// Scale for the SOL/USD price: micro-dollars.
pub const PRICE_SCALE: i64 = 6;

/// Scale for percentage changes: hundredths of a percent.
pub const PERCENT_SCALE: i64 = 2;

// ============================================
// Construction & Parsing
// ============================================

/// Build a decimal from an integer count of `10^-scale` units.
///
/// # Example
/// ```ignore
/// let usd = decimal_from_units(12345, 2); // 123.45
/// ```
pub fn decimal_from_units(units: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(units), scale)
}

/// Convert an `f64` into a decimal rounded to `scale` fractional digits.
///
/// Returns `None` for non-finite input or values that overflow `i64` units.
pub fn decimal_from_f64(value: f64, scale: i64) -> Option<BigDecimal> {
    if !value.is_finite() {
        return None;
    }

    let units = (value * 10f64.powi(scale as i32)).round();
    if units.abs() >= i64::MAX as f64 {
        return None;
    }

    Some(decimal_from_units(units as i64, scale))
}

/// Parse a base-10 string into a decimal.
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    BigDecimal::from_str(value.trim()).ok()
}

/// Lossy conversion for display or range checks; never used for storage.
pub fn decimal_to_f64(value: &BigDecimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

// ============================================
// Serde
// ============================================

/// Serialize a [`BigDecimal`] as its exact base-10 string.
///
/// Use with `#[serde(with = "crate::utils::decimal_string")]`.
pub mod decimal_string {
    use bigdecimal::BigDecimal;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_decimal(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal string: {raw:?}")))
    }
}
