//! Error types for payment form validation and currency conversion.
//!
//! Every validation failure is a [`FieldError`]. Its `Display` output is the
//! exact message shown to the user, so callers can render errors directly.

use std::fmt;
use thiserror::Error;

/// The form field an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// The credit card number.
    CardNumber,
    /// The two-digit expiration month.
    ExpirationMonth,
    /// The two-digit expiration year.
    ExpirationYear,
    /// The amount to pay in HUF.
    Amount,
}

impl Field {
    /// All fields in validation order (card, date, amount).
    pub const ALL: [Field; 4] = [
        Field::CardNumber,
        Field::ExpirationMonth,
        Field::ExpirationYear,
        Field::Amount,
    ];

    /// Returns the form field name as submitted by the payment form.
    #[inline]
    pub const fn form_name(&self) -> &'static str {
        match self {
            Self::CardNumber => "cc-number",
            Self::ExpirationMonth => "expiration-month",
            Self::ExpirationYear => "expiration-year",
            Self::Amount => "amount-huf",
        }
    }

    /// Returns a human-readable label.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CardNumber => "Card number",
            Self::ExpirationMonth => "Expiration month",
            Self::ExpirationYear => "Expiration year",
            Self::Amount => "Amount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Broad classification of a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong character set, wrong length, or a decimal where none is allowed.
    Format,
    /// Amount outside the configured bounds.
    Range,
    /// The card is already expired.
    Expiration,
    /// Luhn checksum failure.
    Checksum,
    /// The field was not submitted or was empty.
    Missing,
}

/// A single validation failure for one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field was empty or absent.
    #[error("{0} is required.")]
    Missing(Field),

    /// The card number contains something other than digits and whitespace.
    #[error("Your card must contain only numbers. No special chars allowed.")]
    CardNotNumeric,

    /// The cleaned card number does not have exactly 16 digits.
    #[error("The card number must be {expected} digits long. Yours is {length}.")]
    CardLength {
        /// The number of digits found.
        length: usize,
        /// The required number of digits.
        expected: usize,
    },

    /// The card number failed the Luhn checksum.
    #[error("Your card failed to pass Luhn algorithm.")]
    CardChecksum,

    /// The month is not exactly two digits.
    #[error("Month: only 2 numbers are allowed!")]
    MonthFormat,

    /// The month is two digits but not 01-12.
    #[error("Month number is invalid.")]
    MonthInvalid,

    /// The year does not have length 2.
    #[error("{0}: length must be 2. Use the last 2 digits only.")]
    YearLength(String),

    /// The year has length 2 but is not two digits.
    #[error("Year: Only numbers are allowed!")]
    YearFormat,

    /// The expiration year is before the current year.
    #[error("Card is expired! Expired year(s).")]
    ExpiredYear,

    /// Current year, but the expiration month has passed.
    #[error("Card is expired! Expired month(s).")]
    ExpiredMonth,

    /// Current month, but the last valid instant of the month has passed.
    #[error("Your card is expired!")]
    Expired,

    /// The amount contains a decimal separator.
    #[error("Amount: No decimals allowed.")]
    AmountDecimal,

    /// The amount is a negative number.
    #[error("Amount: Only positive numbers!")]
    AmountNegative,

    /// The amount could not be parsed as an integer.
    #[error("{0} is not an integer.")]
    AmountNotInteger(String),

    /// The amount is outside the accepted bounds.
    #[error("Amount must be between {min} and {max}!")]
    AmountOutOfRange {
        /// Inclusive lower bound.
        min: u64,
        /// Inclusive upper bound.
        max: u64,
    },
}

impl FieldError {
    /// Returns the field this error belongs to.
    pub const fn field(&self) -> Field {
        match self {
            Self::Missing(field) => *field,
            Self::CardNotNumeric | Self::CardLength { .. } | Self::CardChecksum => {
                Field::CardNumber
            }
            Self::MonthFormat | Self::MonthInvalid | Self::ExpiredMonth | Self::Expired => {
                Field::ExpirationMonth
            }
            Self::YearLength(_) | Self::YearFormat | Self::ExpiredYear => Field::ExpirationYear,
            Self::AmountDecimal
            | Self::AmountNegative
            | Self::AmountNotInteger(_)
            | Self::AmountOutOfRange { .. } => Field::Amount,
        }
    }

    /// Returns the error classification.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Missing(_) => ErrorKind::Missing,
            Self::CardChecksum => ErrorKind::Checksum,
            Self::AmountOutOfRange { .. } => ErrorKind::Range,
            Self::ExpiredYear | Self::ExpiredMonth | Self::Expired => ErrorKind::Expiration,
            Self::CardNotNumeric
            | Self::CardLength { .. }
            | Self::MonthFormat
            | Self::MonthInvalid
            | Self::YearLength(_)
            | Self::YearFormat
            | Self::AmountDecimal
            | Self::AmountNegative
            | Self::AmountNotInteger(_) => ErrorKind::Format,
        }
    }
}

/// Errors raised by a currency converter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The exchange-rate service could not be reached or answered with an error.
    #[error("currency conversion unavailable: {0}")]
    Unavailable(String),

    /// The response body was not the expected JSON shape.
    #[error("malformed exchange-rate response: {0}")]
    MalformedResponse(String),

    /// The response did not contain the requested currency pair.
    #[error("exchange rate for {0} missing from response")]
    MissingRate(String),

    /// The rate was zero or negative.
    #[error("invalid exchange rate {0}")]
    InvalidRate(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration was not valid JSON.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The amount bounds are inconsistent.
    #[error("invalid amount bounds: min {min}, max {max}")]
    InvalidBounds {
        /// Configured lower bound.
        min: u64,
        /// Configured upper bound.
        max: u64,
    },

    /// The converter timeout is zero.
    #[error("converter timeout must be at least 1 second")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FieldError::Missing(Field::CardNumber).to_string(),
            "Card number is required."
        );
        assert_eq!(
            FieldError::CardLength {
                length: 15,
                expected: 16
            }
            .to_string(),
            "The card number must be 16 digits long. Yours is 15."
        );
        assert_eq!(
            FieldError::YearLength("2030".into()).to_string(),
            "2030: length must be 2. Use the last 2 digits only."
        );
        assert_eq!(
            FieldError::AmountOutOfRange { min: 1, max: 1_000_000 }.to_string(),
            "Amount must be between 1 and 1000000!"
        );
        assert_eq!(
            FieldError::AmountNotInteger("abc".into()).to_string(),
            "abc is not an integer."
        );
    }

    #[test]
    fn test_field_attribution() {
        assert_eq!(FieldError::CardChecksum.field(), Field::CardNumber);
        assert_eq!(FieldError::Expired.field(), Field::ExpirationMonth);
        assert_eq!(FieldError::ExpiredYear.field(), Field::ExpirationYear);
        assert_eq!(FieldError::AmountDecimal.field(), Field::Amount);
        assert_eq!(FieldError::Missing(Field::Amount).field(), Field::Amount);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FieldError::CardChecksum.kind(), ErrorKind::Checksum);
        assert_eq!(
            FieldError::AmountOutOfRange { min: 1, max: 2 }.kind(),
            ErrorKind::Range
        );
        assert_eq!(FieldError::ExpiredMonth.kind(), ErrorKind::Expiration);
        assert_eq!(FieldError::AmountDecimal.kind(), ErrorKind::Format);
        assert_eq!(
            FieldError::Missing(Field::ExpirationYear).kind(),
            ErrorKind::Missing
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldError>();
        assert_send_sync::<ConversionError>();
        assert_send_sync::<ConfigError>();
    }
}
