//! Fuzz target for whole-form validation.
//!
//! Tests that every field is reported independently and nothing panics.

#![no_main]

use arbitrary::Arbitrary;
use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use payment_form::{FixedClock, PaymentFormValidator, PaymentSubmission, PaymentView};

#[derive(Debug, Arbitrary)]
struct Input {
    card_number: String,
    month: String,
    year: String,
    amount: String,
}

fuzz_target!(|input: Input| {
    let Some(now) = NaiveDate::from_ymd_opt(2024, 6, 15).and_then(|d| d.and_hms_opt(12, 0, 0))
    else {
        return;
    };
    let validator = PaymentFormValidator::with_clock(FixedClock(now));
    let submission =
        PaymentSubmission::new(input.card_number, input.month, input.year, input.amount);

    let report = validator.validate(&submission);
    assert_eq!(report.is_valid(), report.errors().is_empty());
    assert!(report.errors().len() <= 3);

    let view = PaymentView::from_report(&report);
    assert_eq!(view.accepted, report.is_valid());
    if let Some(card) = report.card().value() {
        let stored = view.stored.card_number.unwrap_or_default();
        assert!(!stored.contains(&card.number()));
    }
});
