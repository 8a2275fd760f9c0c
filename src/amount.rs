//! Validation of the amount to pay, in whole Hungarian forints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Default minimum amount in HUF.
pub const MIN_AMOUNT: u64 = 1;

/// Default maximum amount in HUF.
pub const MAX_AMOUNT: u64 = 1_000_000;

/// Inclusive bounds for an accepted amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLimits {
    /// Smallest accepted amount.
    pub min: u64,
    /// Largest accepted amount.
    pub max: u64,
}

impl AmountLimits {
    /// Creates new limits. Returns `None` if `min` is zero or above `max`.
    pub fn new(min: u64, max: u64) -> Option<Self> {
        if min == 0 || min > max {
            return None;
        }
        Some(Self { min, max })
    }

    /// Returns true if `value` lies within the bounds.
    #[inline]
    pub const fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for AmountLimits {
    fn default() -> Self {
        Self {
            min: MIN_AMOUNT,
            max: MAX_AMOUNT,
        }
    }
}

/// A validated amount in HUF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Returns the amount in whole forints.
    #[inline]
    pub const fn huf(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validates a raw amount string against `limits`.
///
/// Surrounding whitespace is ignored. Checks, in order:
/// 1. no `.` or `,` anywhere
/// 2. not a negative number (`-` followed only by digits)
/// 3. parses as an integer
/// 4. lies within `limits`
///
/// # Example
///
/// ```
/// use payment_form::amount::{validate_amount, AmountLimits};
///
/// let amount = validate_amount("1000", &AmountLimits::default()).unwrap();
/// assert_eq!(amount.huf(), 1000);
///
/// assert!(validate_amount("10.5", &AmountLimits::default()).is_err());
/// assert!(validate_amount("0", &AmountLimits::default()).is_err());
/// ```
pub fn validate_amount(input: &str, limits: &AmountLimits) -> Result<Amount, FieldError> {
    let trimmed = input.trim();

    if trimmed.contains(['.', ',']) {
        return Err(FieldError::AmountDecimal);
    }

    if let Some(rest) = trimmed.strip_prefix('-') {
        if rest.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::AmountNegative);
        }
    }

    let value: u64 = match trimmed.parse() {
        Ok(value) => value,
        // All digits but too large for u64: a number, just out of bounds.
        Err(_) if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) => {
            return Err(out_of_range(limits));
        }
        Err(_) => return Err(FieldError::AmountNotInteger(input.to_string())),
    };

    if !limits.contains(value) {
        return Err(out_of_range(limits));
    }

    Ok(Amount(value))
}

fn out_of_range(limits: &AmountLimits) -> FieldError {
    FieldError::AmountOutOfRange {
        min: limits.min,
        max: limits.max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str) -> Result<Amount, FieldError> {
        validate_amount(input, &AmountLimits::default())
    }

    #[test]
    fn test_valid_amounts() {
        assert_eq!(check("1").unwrap().huf(), 1);
        assert_eq!(check("1000").unwrap().huf(), 1000);
        assert_eq!(check("1000000").unwrap().huf(), 1_000_000);
        assert_eq!(check(" 250 ").unwrap().huf(), 250);
    }

    #[test]
    fn test_decimals_rejected() {
        assert_eq!(check("10.5").unwrap_err(), FieldError::AmountDecimal);
        assert_eq!(check("10,5").unwrap_err(), FieldError::AmountDecimal);
        assert_eq!(check(".5").unwrap_err(), FieldError::AmountDecimal);
        assert_eq!(check("-1.5").unwrap_err(), FieldError::AmountDecimal);
        assert_eq!(check("abc,").unwrap_err(), FieldError::AmountDecimal);
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(check("-5").unwrap_err(), FieldError::AmountNegative);
        assert_eq!(check("-").unwrap_err(), FieldError::AmountNegative);
        assert_eq!(check(" -5").unwrap_err(), FieldError::AmountNegative);
        assert_eq!(check("-5 ").unwrap_err(), FieldError::AmountNegative);
    }

    #[test]
    fn test_not_an_integer() {
        assert_eq!(
            check("abc").unwrap_err(),
            FieldError::AmountNotInteger("abc".into())
        );
        assert_eq!(
            check("-5x").unwrap_err(),
            FieldError::AmountNotInteger("-5x".into())
        );
        assert_eq!(
            check("12 34").unwrap_err(),
            FieldError::AmountNotInteger("12 34".into())
        );
    }

    #[test]
    fn test_range_boundaries() {
        let range = FieldError::AmountOutOfRange {
            min: 1,
            max: 1_000_000,
        };
        assert_eq!(check("0").unwrap_err(), range);
        assert_eq!(check("1000001").unwrap_err(), range);
        assert_eq!(check("99999999999999999999999").unwrap_err(), range);
    }

    #[test]
    fn test_custom_limits() {
        let limits = AmountLimits::new(100, 500).unwrap();
        assert!(validate_amount("100", &limits).is_ok());
        assert!(validate_amount("500", &limits).is_ok());
        assert_eq!(
            validate_amount("99", &limits).unwrap_err(),
            FieldError::AmountOutOfRange { min: 100, max: 500 }
        );
    }

    #[test]
    fn test_limits_new() {
        assert!(AmountLimits::new(0, 10).is_none());
        assert!(AmountLimits::new(11, 10).is_none());
        assert!(AmountLimits::new(10, 10).is_some());
    }
}
