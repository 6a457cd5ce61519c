//! Utility functions for the SolPulse service.
//!
//! - [`decimal`] - Fixed-point decimal construction, parsing and string serde
//! - [`validation`] - Query-parameter coercion and upstream value bounds

mod decimal;
mod validation;

// ============================================
// Re-exports
// ============================================

// Decimal utilities
pub use decimal::{
    decimal_from_f64, decimal_from_units, decimal_string, decimal_to_f64, parse_decimal,
    AMOUNT_SCALE, PERCENT_SCALE, PRICE_SCALE,
};

// Validation utilities
pub use validation::{
    resolve_days, validate_price_change, validate_sol_price, MAX_PRICE_CHANGE_PCT,
    MAX_SOL_USD_PRICE,
};
