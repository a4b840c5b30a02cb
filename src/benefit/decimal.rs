//! Exact decimal normalization for display values

use std::str::FromStr;

use rust_decimal::Decimal;

use super::BenefitError;

/// Strip trailing fractional zeros from a decimal without touching its
/// integer digits, so `5000.40000` becomes `5000.4` and `5000.0` becomes
/// `5000`.
pub fn remove_exponent_and_trailing_zeros(value: Decimal) -> Decimal {
    // normalize never drops below scale 0 and folds -0 into 0
    value.normalize()
}

/// Parse a stored decimal value, accepting exponent notation (`5E+3`).
pub fn parse_decimal(raw: &str) -> Result<Decimal, BenefitError> {
    let trimmed = raw.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| BenefitError::InvalidValue(raw.to_string()))
}
