// models/money.rs
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Fare buttons offered on the amount screen.
pub const PRESET_AMOUNTS: [u32; 4] = [50, 100, 200, 500];

/// A fare in KSh. Always positive, never more than two decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO || value.normalize().scale() > 2 {
            return Err(AppError::InvalidAmount);
        }
        Ok(Amount(value))
    }

    /// Parses conductor input. Accepts what the amount field's mask lets through
    /// (`^\d*\.?\d{0,2}$`) and then requires a value above zero.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (whole, fraction) = match input.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };

        let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if input.is_empty()
            || !digits_only(whole)
            || !digits_only(fraction)
            || fraction.len() > 2
            || (whole.is_empty() && fraction.is_empty())
        {
            return Err(AppError::InvalidAmount);
        }

        let whole = if whole.is_empty() { "0" } else { whole };
        let canonical = if fraction.is_empty() {
            whole.to_string()
        } else {
            format!("{}.{}", whole, fraction)
        };

        let value = Decimal::from_str(&canonical).map_err(|_| AppError::InvalidAmount)?;
        Amount::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The provider wants the amount as a string without trailing zeros.
    pub fn to_request_string(&self) -> String {
        self.0.normalize().to_string()
    }

    pub fn display_ksh(&self) -> String {
        format!("KSh {}", self)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        value.rescale(2);
        write!(f, "{}", value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AppError;

    fn try_from(value: Decimal) -> Result<Self> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}
