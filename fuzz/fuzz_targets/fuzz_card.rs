//! Fuzz target for card number validation.
//!
//! Tests that card validation never panics and never leaks the number.

#![no_main]

use libfuzzer_sys::fuzz_target;
use payment_form::{is_valid_card_number, mask, validate_card_number};

fuzz_target!(|data: &str| {
    let _ = is_valid_card_number(data);
    let _ = mask::mask_string(data);

    if let Ok(card) = validate_card_number(data) {
        let number = card.number();
        assert_eq!(number.len(), 16);
        assert!(!format!("{:?}", card).contains(&number));
        assert!(!card.masked().contains(&number));
    }
});
