//! Input and upstream-value validation.
//!
//! Bounds here catch garbage from query strings and external price feeds:
//!
//! 1. WINDOW: the `days` query parameter is coerced, never rejected. Anything
//!    that is not a positive integer falls back to the endpoint default, and
//!    large windows are clamped so a single request cannot synthesize years
//!    of daily rows.
//!
//! 2. SOL PRICE: a SOL quote outside (0, $1M] is a feed error, not a market.
//!
//! 3. PRICE CHANGE: a 24h move beyond ±100% means the feed sent a ratio or
//!    basis points instead of a percentage.

// ============================================
// Validation Constants
// ============================================

/// Maximum reasonable SOL/USD price.
pub const MAX_SOL_USD_PRICE: f64 = 1e6;

/// Maximum absolute 24h price change, in percent.
pub const MAX_PRICE_CHANGE_PCT: f64 = 100.0;

// ============================================
// Helpers
// ============================================

/// Leading integer of `value`, after optional whitespace and sign.
///
/// Trailing garbage is ignored (`"3.7"` is 3, `"14abc"` is 14). Digit runs too
/// long for an `i64` saturate.
fn leading_integer(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Resolve a raw `days` query value into a window length.
///
/// The leading integer of the value is used. Missing, non-numeric, zero and
/// negative values yield `default`. Values above `max` are clamped to `max`.
pub fn resolve_days(raw: Option<&str>, default: u32, max: u32) -> u32 {
    let parsed = raw.and_then(leading_integer);

    match parsed {
        Some(days) if days > 0 => days.min(max as i64) as u32,
        _ => default.min(max),
    }
}

/// Validate a SOL/USD price from an external feed.
/// Returns Some(price) if valid, None if invalid.
#[inline]
pub fn validate_sol_price(price: f64) -> Option<f64> {
    if price > 0.0 && price.is_finite() && price <= MAX_SOL_USD_PRICE {
        Some(price)
    } else {
        None
    }
}

/// Validate a 24h percentage change from an external feed.
#[inline]
pub fn validate_price_change(change: f64) -> Option<f64> {
    if change.is_finite() && change.abs() <= MAX_PRICE_CHANGE_PCT {
        Some(change)
    } else {
        None
    }
}
