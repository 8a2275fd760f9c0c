//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use chrono::NaiveDate;
use proptest::prelude::*;

use payment_form::{
    generate::generate_card_deterministic, luhn, mask, validate_amount, validate_card_number,
    validate_expiry, AmountLimits, FieldError, FixedClock, PaymentFormValidator,
    PaymentSubmission, CARD_DIGITS,
};

// =============================================================================
// STRATEGIES
// =============================================================================

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a valid 16-digit card from a random 15-digit body.
fn valid_card_strategy() -> impl Strategy<Value = String> {
    digit_string(CARD_DIGITS - 1).prop_map(|body| {
        generate_card_deterministic(&body).expect("15 digits always fit")
    })
}

fn clock() -> FixedClock {
    FixedClock(
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

// =============================================================================
// CARD NUMBER PROPERTIES
// =============================================================================

proptest! {
    /// Generated cards always validate.
    #[test]
    fn generated_cards_are_valid(card in valid_card_strategy()) {
        prop_assert!(validate_card_number(&card).is_ok());
    }

    /// Changing exactly one digit always breaks the checksum.
    #[test]
    fn single_digit_change_detected(
        card in valid_card_strategy(),
        pos in 0..CARD_DIGITS,
        delta in 1u8..10,
    ) {
        let mut bytes = card.into_bytes();
        bytes[pos] = b'0' + (bytes[pos] - b'0' + delta) % 10;
        let changed = String::from_utf8(bytes).unwrap();
        prop_assert_eq!(
            validate_card_number(&changed).unwrap_err(),
            FieldError::CardChecksum
        );
    }

    /// Whitespace anywhere is ignored.
    #[test]
    fn whitespace_ignored(
        card in valid_card_strategy(),
        gaps in proptest::collection::vec(0usize..4, CARD_DIGITS),
    ) {
        let spaced: String = card
            .chars()
            .zip(gaps)
            .map(|(c, n)| format!("{}{}", " ".repeat(n), c))
            .collect();
        let parsed = validate_card_number(&spaced).unwrap();
        prop_assert_eq!(parsed.number(), card);
    }

    /// Any digit string that is not 16 long is rejected for length.
    #[test]
    fn wrong_length_rejected(len in (1usize..32).prop_filter("not 16", |l| *l != CARD_DIGITS)) {
        let input = "4".repeat(len);
        let is_length_error = matches!(
            validate_card_number(&input),
            Err(FieldError::CardLength { length, expected: 16 }) if length == len
        );
        prop_assert!(is_length_error);
    }

    /// Validation never panics on arbitrary input.
    #[test]
    fn card_validation_never_panics(s in "\\PC*") {
        let _ = validate_card_number(&s);
    }

    /// Masking never reveals more than the last four digits.
    #[test]
    fn mask_hides_all_but_last_four(card in valid_card_strategy()) {
        let masked = mask::mask_string(&card);
        let visible: String = masked.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(visible.as_str(), &card[CARD_DIGITS - 4..]);
    }

    /// The generic and fixed-size Luhn checks agree.
    #[test]
    fn luhn_16_matches_generic(digits in proptest::array::uniform16(0u8..10)) {
        prop_assert_eq!(luhn::validate(&digits), luhn::validate_16(&digits));
    }
}

// =============================================================================
// EXPIRY PROPERTIES
// =============================================================================

proptest! {
    /// Any month of a future year is valid.
    #[test]
    fn future_years_valid(month in 1u8..=12, year in 25u16..=99) {
        let mm = format!("{:02}", month);
        let yy = format!("{:02}", year);
        let expiry = validate_expiry(&mm, &yy, &clock()).unwrap();
        prop_assert_eq!(expiry.month(), month);
        prop_assert_eq!(expiry.year(), 2000 + year);
    }

    /// Any year before the current one is expired.
    #[test]
    fn past_years_expired(month in 1u8..=12, year in 0u16..24) {
        let mm = format!("{:02}", month);
        let yy = format!("{:02}", year);
        prop_assert_eq!(
            validate_expiry(&mm, &yy, &clock()).unwrap_err(),
            FieldError::ExpiredYear
        );
    }

    /// Expiry parsing never panics on arbitrary input.
    #[test]
    fn expiry_never_panics(mm in "\\PC{0,4}", yy in "\\PC{0,4}") {
        let _ = validate_expiry(&mm, &yy, &clock());
    }
}

// =============================================================================
// AMOUNT PROPERTIES
// =============================================================================

proptest! {
    /// Every whole amount within bounds is accepted unchanged.
    #[test]
    fn amounts_in_range_accepted(value in 1u64..=1_000_000) {
        let amount = validate_amount(&value.to_string(), &AmountLimits::default()).unwrap();
        prop_assert_eq!(amount.huf(), value);
    }

    /// Amounts above the maximum are out of range.
    #[test]
    fn amounts_above_max_rejected(value in 1_000_001u64..) {
        let is_range_error = matches!(
            validate_amount(&value.to_string(), &AmountLimits::default()),
            Err(FieldError::AmountOutOfRange { .. })
        );
        prop_assert!(is_range_error);
    }

    /// A decimal separator is always rejected, whatever surrounds it.
    #[test]
    fn decimals_rejected(
        whole in 0u64..1_000_000,
        frac in 0u32..100,
        sep in prop_oneof![Just('.'), Just(',')],
    ) {
        let input = format!("{}{}{}", whole, sep, frac);
        prop_assert_eq!(
            validate_amount(&input, &AmountLimits::default()).unwrap_err(),
            FieldError::AmountDecimal
        );
    }

    /// Negative integers are reported as negative.
    #[test]
    fn negatives_rejected(value in 0u64..10_000_000) {
        prop_assert_eq!(
            validate_amount(&format!("-{}", value), &AmountLimits::default()).unwrap_err(),
            FieldError::AmountNegative
        );
    }
}

// =============================================================================
// FORM PROPERTIES
// =============================================================================

proptest! {
    /// A report is valid iff it carries no errors.
    #[test]
    fn valid_iff_no_errors(
        card in prop_oneof![valid_card_strategy(), digit_string(16), "\\PC{0,20}"],
        mm in prop_oneof![Just("06".to_string()), Just("13".to_string()), "[0-9]{2}"],
        yy in prop_oneof![Just("24".to_string()), Just("30".to_string()), "[0-9]{1,3}"],
        amount in prop_oneof![Just("1000".to_string()), "-?[0-9]{1,8}", "[0-9]+[.,][0-9]"],
    ) {
        let validator = PaymentFormValidator::with_clock(clock());
        let report = validator.validate(&PaymentSubmission::new(card, mm, yy, amount));
        prop_assert_eq!(report.is_valid(), report.errors().is_empty());
        prop_assert_eq!(report.is_valid(), report.accepted_amount().is_some());
        prop_assert!(report.errors().len() <= 3);
    }
}
