//! Test card number generation.
//!
//! Generates 16-digit numbers that pass the payment form's checks. They are
//! intended for testing only and are not connected to real accounts.
//!
//! # Example
//!
//! ```
//! use payment_form::card::is_valid_card_number;
//! use payment_form::generate::generate_card_deterministic;
//!
//! let card = generate_card_deterministic("4539").unwrap();
//! assert!(card.starts_with("4539"));
//! assert!(is_valid_card_number(&card));
//! ```

use crate::card::CARD_DIGITS;
use crate::luhn;

#[cfg(feature = "generate")]
use rand::Rng;

/// Default prefix for generated cards (a Visa-style IIN).
pub const DEFAULT_PREFIX: &str = "4";

fn prefix_digits(prefix: &str) -> Option<Vec<u8>> {
    if prefix.len() >= CARD_DIGITS {
        return None;
    }
    prefix
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn finish(mut digits: Vec<u8>) -> String {
    let check_digit = luhn::generate_check_digit(&digits);
    digits.push(check_digit);
    digits.iter().map(|&d| (b'0' + d) as char).collect()
}

/// Generates a valid card number deterministically.
///
/// Fills the digits after `prefix` with zeros and appends the check digit.
/// Returns `None` if `prefix` has a non-digit or 16 or more characters.
pub fn generate_card_deterministic(prefix: &str) -> Option<String> {
    let mut digits = prefix_digits(prefix)?;
    digits.resize(CARD_DIGITS - 1, 0);
    Some(finish(digits))
}

/// Generates a valid card number with random digits after `prefix`.
///
/// Useful with seeded RNGs for reproducible test data.
#[cfg(feature = "generate")]
pub fn generate_card_with_rng<R: Rng>(prefix: &str, rng: &mut R) -> Option<String> {
    let mut digits = prefix_digits(prefix)?;
    while digits.len() < CARD_DIGITS - 1 {
        digits.push(rng.gen_range(0..10));
    }
    Some(finish(digits))
}

/// Generates a valid card number using the thread-local RNG.
#[cfg(feature = "generate")]
pub fn generate_card(prefix: &str) -> Option<String> {
    generate_card_with_rng(prefix, &mut rand::thread_rng())
}

/// Generates `count` valid card numbers.
#[cfg(feature = "generate")]
pub fn generate_cards(prefix: &str, count: usize) -> Option<Vec<String>> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| generate_card_with_rng(prefix, &mut rng))
        .collect()
}
