//! Fuzz target for amount validation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payment_form::{validate_amount, AmountLimits};

fuzz_target!(|data: &str| {
    let limits = AmountLimits::default();
    if let Ok(amount) = validate_amount(data, &limits) {
        assert!(limits.contains(amount.huf()));
        assert!(!data.contains(['.', ',']));
    }
});
