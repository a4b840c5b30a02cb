//! Benefit display formatting.
//!
//! Turns a discount benefit into the string shown in offer emails and
//! coupon listings:
//! - percentage benefits render as `35%`
//! - fixed-amount benefits render with their currency symbol, e.g. `$90`
//!
//! Values are normalized exactly (no floating point) before rendering.

mod decimal;

use rust_decimal::Decimal;
use rusty_money::iso;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use decimal::{parse_decimal, remove_exponent_and_trailing_zeros};

/// Benefit type discriminator stored on percentage benefits
pub const PERCENTAGE: &str = "Percentage";

/// Benefit type discriminator stored on fixed-amount benefits
pub const FIXED: &str = "Absolute";

/// Errors raised while reading a stored benefit record
#[derive(Debug, Error, PartialEq)]
pub enum BenefitError {
    #[error("Invalid benefit value: {0}")]
    InvalidValue(String),

    #[error("Cannot determine benefit kind (type: {kind:?}, proxy class: {proxy_class:?})")]
    UnknownKind {
        kind: Option<String>,
        proxy_class: Option<String>,
    },
}

/// A discount benefit ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Benefit {
    /// Percentage off the range price
    Percentage { value: Decimal },
    /// Fixed amount off, in the given ISO currency
    FixedAmount { value: Decimal, currency: String },
}

impl Benefit {
    pub fn percentage(value: Decimal) -> Self {
        Self::Percentage { value }
    }

    pub fn fixed_amount(value: Decimal, currency: impl Into<String>) -> Self {
        Self::FixedAmount {
            value,
            currency: currency.into(),
        }
    }

    /// Raw (unnormalized) benefit value
    pub fn value(&self) -> Decimal {
        match self {
            Self::Percentage { value } | Self::FixedAmount { value, .. } => *value,
        }
    }
}

/// Numeric value as it comes out of the promotions store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredValue {
    Text(String),
    Number(serde_json::Number),
}

impl StoredValue {
    pub fn to_decimal(&self) -> Result<Decimal, BenefitError> {
        match self {
            Self::Text(s) => parse_decimal(s),
            Self::Number(n) => parse_decimal(&n.to_string()),
        }
    }
}

/// A benefit row read from the promotions store.
///
/// Range-less program benefits leave `type` empty and carry their concrete
/// kind in `proxy_class` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenefitRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_class: Option<String>,

    pub value: StoredValue,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BenefitKind {
    Percentage,
    Fixed,
}

impl BenefitRecord {
    /// Resolve the record into a displayable benefit.
    ///
    /// `default_currency` is used for fixed amounts stored without a currency.
    pub fn resolve(&self, default_currency: &str) -> Result<Benefit, BenefitError> {
        let value = self.value.to_decimal()?;

        let benefit = match self.benefit_kind()? {
            BenefitKind::Percentage => Benefit::percentage(value),
            BenefitKind::Fixed => Benefit::fixed_amount(
                value,
                self.currency.as_deref().unwrap_or(default_currency),
            ),
        };

        Ok(benefit)
    }

    fn benefit_kind(&self) -> Result<BenefitKind, BenefitError> {
        let from_type = match self.kind.as_deref().map(str::trim) {
            Some(PERCENTAGE) => Some(BenefitKind::Percentage),
            Some(FIXED) => Some(BenefitKind::Fixed),
            _ => None,
        };

        from_type
            .or_else(|| self.proxy_class.as_deref().and_then(kind_from_proxy_class))
            .ok_or_else(|| BenefitError::UnknownKind {
                kind: self.kind.clone(),
                proxy_class: self.proxy_class.clone(),
            })
    }
}

fn kind_from_proxy_class(path: &str) -> Option<BenefitKind> {
    let class_name = path.rsplit('.').next().unwrap_or(path);

    if class_name.starts_with("PercentageDiscountBenefit") {
        Some(BenefitKind::Percentage)
    } else if class_name.starts_with("AbsoluteDiscountBenefit") {
        Some(BenefitKind::Fixed)
    } else {
        None
    }
}

/// Format a benefit for display: `35%` or `$90`.
pub fn format_benefit_value(benefit: &Benefit) -> String {
    let value = remove_exponent_and_trailing_zeros(benefit.value());

    match benefit {
        Benefit::Percentage { .. } => format!("{}%", value),
        Benefit::FixedAmount { currency, .. } => add_currency(value, currency),
    }
}

fn add_currency(amount: Decimal, code: &str) -> String {
    match iso::find(&code.trim().to_uppercase()) {
        Some(currency) if currency.symbol_first => format!("{}{}", currency.symbol, amount),
        Some(currency) => format!("{}{}", amount, currency.symbol),
        None => format!("{} {}", code, amount),
    }
}
