//! Luhn checksum used to validate card numbers.
//!
//! Digits are processed right to left. Every second digit is doubled, and a
//! doubled value above 9 is reduced by 9 (the same as summing its two decimal
//! digits). The number is valid when the total is divisible by 10.

/// Doubled digit after reduction: `2 * d`, minus 9 when the result exceeds 9.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a digit sequence using the Luhn algorithm.
///
/// `digits` holds digit values (0-9), not ASCII characters. An empty slice
/// never validates.
///
/// # Example
///
/// ```
/// use payment_form::luhn::validate;
///
/// let digits = [4, 5, 3, 9, 1, 4, 8, 8, 0, 3, 4, 3, 6, 4, 6, 7];
/// assert!(validate(&digits));
///
/// let invalid = [4, 5, 3, 9, 1, 4, 8, 8, 0, 3, 4, 3, 6, 4, 6, 0];
/// assert!(!validate(&invalid));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    compute_checksum(digits) % 10 == 0
}

/// Computes the Luhn sum (not reduced modulo 10).
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 1 {
                DOUBLE_TABLE[digit as usize] as u32
            } else {
                digit as u32
            }
        })
        .sum()
}

/// Computes the check digit that completes `digits` into a valid number.
///
/// # Example
///
/// ```
/// use payment_form::luhn::generate_check_digit;
///
/// let partial = [4, 5, 3, 9, 1, 4, 8, 8, 0, 3, 4, 3, 6, 4, 6];
/// assert_eq!(generate_check_digit(&partial), 7);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Once the check digit is appended, every existing digit moves one
    // position left, so the rightmost one here is doubled.
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| {
            if i % 2 == 0 {
                DOUBLE_TABLE[digit as usize] as u32
            } else {
                digit as u32
            }
        })
        .sum();

    ((10 - (sum % 10)) % 10) as u8
}

/// Validation for the form's fixed 16-digit card length.
///
/// With an even length the doubled digits are exactly the even indices, so
/// the digits can be summed in pairs without reversing.
#[inline]
pub fn validate_16(digits: &[u8; 16]) -> bool {
    let sum: u32 = digits
        .chunks_exact(2)
        .map(|pair| DOUBLE_TABLE[pair[0] as usize] as u32 + pair[1] as u32)
        .sum();

    sum % 10 == 0
}
