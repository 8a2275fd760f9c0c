//! Fuzz target for expiry date parsing.
//!
//! Tests that expiry validation never panics on arbitrary input.

#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;
use payment_form::{expiry, validate_expiry, FixedClock};

fuzz_target!(|data: (&str, &str)| {
    let (mm, yy) = data;
    let _ = expiry::parse_month(mm);
    let _ = expiry::parse_year(yy);

    let Some(now) = NaiveDate::from_ymd_opt(2024, 6, 15).and_then(|d| d.and_hms_opt(12, 0, 0))
    else {
        return;
    };
    if let Ok(exp) = validate_expiry(mm, yy, &FixedClock(now)) {
        assert_eq!(exp.month_str(), mm);
        assert_eq!(exp.year_str(), yy);
        assert!(exp.last_valid_instant().is_some());
        let _ = exp.to_string();
    }
});
