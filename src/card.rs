//! Card number validation.
//!
//! The payment form accepts exactly 16-digit card numbers. Whitespace is
//! stripped before checking, so `"4539 1488 0343 6467"` is accepted.

use std::fmt;
use zeroize::Zeroize;

use crate::error::FieldError;
use crate::luhn;

/// Number of digits the payment form requires.
pub const CARD_DIGITS: usize = 16;

/// A validated 16-digit card number with secure memory handling.
///
/// # Security
///
/// - Digits are private and only reachable through [`CardNumber::number`]
/// - Memory is zeroed on drop using the `zeroize` crate
/// - `Debug` and `Display` only ever show the masked number
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber {
    digits: [u8; CARD_DIGITS],
}

impl CardNumber {
    #[inline]
    pub(crate) fn new(digits: [u8; CARD_DIGITS]) -> Self {
        Self { digits }
    }

    /// Returns the last four digits. Safe for logging and display.
    pub fn last_four(&self) -> String {
        self.digits[CARD_DIGITS - 4..]
            .iter()
            .map(|&d| (b'0' + d) as char)
            .collect()
    }

    /// Returns the full cleaned card number.
    ///
    /// # Security Warning
    ///
    /// This exposes the full card number. Never log the result; use
    /// `masked()` for display.
    pub fn number(&self) -> String {
        self.digits.iter().map(|&d| (b'0' + d) as char).collect()
    }

    /// Returns the masked card number, e.g. `****-****-****-6467`.
    #[inline]
    pub fn masked(&self) -> String {
        crate::mask::mask_card(self)
    }

    #[inline]
    pub(crate) fn digits(&self) -> &[u8; CARD_DIGITS] {
        &self.digits
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardNumber")
            .field("number", &self.masked())
            .finish()
    }
}

impl fmt::Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl Drop for CardNumber {
    fn drop(&mut self) {
        self.digits.zeroize();
    }
}

/// Validates a raw card number as submitted by the form.
///
/// Checks run in order and the first failure is returned:
/// 1. only digits remain once all whitespace is removed
/// 2. exactly [`CARD_DIGITS`] digits
/// 3. Luhn checksum
///
/// # Example
///
/// ```
/// use payment_form::card::validate_card_number;
///
/// let card = validate_card_number(" 4539 1488 0343 6467 ").unwrap();
/// assert_eq!(card.last_four(), "6467");
///
/// assert!(validate_card_number("4539148803436460").is_err());
/// ```
pub fn validate_card_number(input: &str) -> Result<CardNumber, FieldError> {
    let mut cleaned: Vec<u8> = Vec::with_capacity(CARD_DIGITS);
    for c in input.chars().filter(|c| !c.is_whitespace()) {
        match c.to_digit(10) {
            Some(d) => cleaned.push(d as u8),
            None => {
                cleaned.zeroize();
                return Err(FieldError::CardNotNumeric);
            }
        }
    }

    let digits: [u8; CARD_DIGITS] = match cleaned.as_slice().try_into() {
        Ok(digits) => digits,
        Err(_) => {
            let length = cleaned.len();
            cleaned.zeroize();
            return Err(FieldError::CardLength {
                length,
                expected: CARD_DIGITS,
            });
        }
    };
    cleaned.zeroize();

    let card = CardNumber::new(digits);
    if !luhn::validate_16(card.digits()) {
        return Err(FieldError::CardChecksum);
    }

    Ok(card)
}

/// Quick yes/no check for a raw card number.
#[inline]
pub fn is_valid_card_number(input: &str) -> bool {
    validate_card_number(input).is_ok()
}
