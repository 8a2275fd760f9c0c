//! Fuzz target for Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payment_form::luhn;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    let _ = luhn::validate(&digits);

    if let Ok(arr) = <[u8; 16]>::try_from(digits.as_slice()) {
        assert_eq!(luhn::validate(&digits), luhn::validate_16(&arr));
    }

    if !digits.is_empty() && digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9);

        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check));
    }
});
