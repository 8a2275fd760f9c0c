//! Masking utilities for displaying card numbers.
//!
//! Only the last four digits are ever shown. Stored-value echoes and log
//! lines go through these helpers, never through the raw number.

use crate::card::{CardNumber, CARD_DIGITS};

/// Masks a validated card number as `****-****-****-1234`.
///
/// # Example
///
/// ```
/// use payment_form::card::validate_card_number;
/// use payment_form::mask::mask_card;
///
/// let card = validate_card_number("4539148803436467").unwrap();
/// assert_eq!(mask_card(&card), "****-****-****-6467");
/// ```
pub fn mask_card(card: &CardNumber) -> String {
    let tail = card.digits()[CARD_DIGITS - 4..].iter().map(|&d| (b'0' + d) as char);
    mask_with(CARD_DIGITS - 4, tail)
}

/// Masks a raw, unvalidated card number string.
///
/// Non-digit characters are dropped before masking. Inputs of four digits
/// or fewer are masked entirely.
pub fn mask_string(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let len = digits.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    mask_with(len - 4, digits[len - 4..].iter().copied())
}

/// Writes `hidden` stars in groups of four, then the visible tail.
///
/// The tail stays in one group; it is dash-separated only when the stars
/// fill whole groups.
fn mask_with(hidden: usize, tail: impl Iterator<Item = char>) -> String {
    let mut result = String::with_capacity(hidden + hidden / 4 + 5);

    for i in 0..hidden {
        if i > 0 && i % 4 == 0 {
            result.push('-');
        }
        result.push('*');
    }

    if hidden % 4 == 0 {
        result.push('-');
    }

    result.extend(tail);
    result
}
