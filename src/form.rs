//! Payment form orchestration.
//!
//! [`PaymentFormValidator`] runs every field validator on a
//! [`PaymentSubmission`] with no short-circuiting between fields, and returns a
//! [`FormReport`] holding one structured outcome per field. The ordered error
//! stack and the per-field view are both derived from those outcomes.

use serde::{Deserialize, Serialize};

use crate::amount::{validate_amount, Amount, AmountLimits};
use crate::card::{validate_card_number, CardNumber};
use crate::clock::{Clock, SystemClock};
use crate::error::{Field, FieldError};
use crate::expiry::{validate_expiry, ExpiryDate};

/// Raw user input, exactly as submitted.
///
/// Deserializes from the form's field names. Absent fields become empty
/// strings and are reported as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentSubmission {
    /// Card number, possibly containing whitespace.
    #[serde(rename = "cc-number", alias = "card_number", default)]
    pub card_number: String,
    /// Two-digit expiration month.
    #[serde(rename = "expiration-month", alias = "expiration_month", default)]
    pub expiration_month: String,
    /// Two-digit expiration year.
    #[serde(rename = "expiration-year", alias = "expiration_year", default)]
    pub expiration_year: String,
    /// Amount to pay in HUF.
    #[serde(rename = "amount-huf", alias = "amount", default)]
    pub amount: String,
}

impl PaymentSubmission {
    /// Creates a submission from the four raw fields.
    pub fn new(
        card_number: impl Into<String>,
        expiration_month: impl Into<String>,
        expiration_year: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            expiration_month: expiration_month.into(),
            expiration_year: expiration_year.into(),
            amount: amount.into(),
        }
    }
}

/// Result of validating one field (or field group).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome<T> {
    /// The field is valid; holds the normalized value.
    Valid(T),
    /// The field is invalid; holds the errors in detection order.
    Invalid(Vec<FieldError>),
}

impl<T> ValidationOutcome<T> {
    /// Returns true if the outcome is `Valid`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Returns the normalized value, if valid.
    #[inline]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Invalid(_) => None,
        }
    }

    /// Returns the errors (empty if valid).
    #[inline]
    pub fn errors(&self) -> &[FieldError] {
        match self {
            Self::Valid(_) => &[],
            Self::Invalid(errors) => errors,
        }
    }
}

impl<T> From<Result<T, FieldError>> for ValidationOutcome<T> {
    fn from(result: Result<T, FieldError>) -> Self {
        match result {
            Ok(value) => Self::Valid(value),
            Err(error) => Self::Invalid(vec![error]),
        }
    }
}

/// Validation result for a whole submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    card: ValidationOutcome<CardNumber>,
    expiry: ValidationOutcome<ExpiryDate>,
    amount: ValidationOutcome<Amount>,
}

impl FormReport {
    /// Card number outcome.
    #[inline]
    pub fn card(&self) -> &ValidationOutcome<CardNumber> {
        &self.card
    }

    /// Expiration date outcome (month and year together).
    #[inline]
    pub fn expiry(&self) -> &ValidationOutcome<ExpiryDate> {
        &self.expiry
    }

    /// Amount outcome.
    #[inline]
    pub fn amount(&self) -> &ValidationOutcome<Amount> {
        &self.amount
    }

    /// Returns true if `field` validated.
    ///
    /// Month and year are validated together, so they are valid or invalid as a pair.
    pub fn is_field_valid(&self, field: Field) -> bool {
        match field {
            Field::CardNumber => self.card.is_valid(),
            Field::ExpirationMonth | Field::ExpirationYear => self.expiry.is_valid(),
            Field::Amount => self.amount.is_valid(),
        }
    }

    /// Returns true iff card, month, year and amount are all valid.
    pub fn is_valid(&self) -> bool {
        Field::ALL.iter().all(|&field| self.is_field_valid(field))
    }

    /// All errors in validation order: card, then date, then amount.
    pub fn errors(&self) -> Vec<&FieldError> {
        self.card
            .errors()
            .iter()
            .chain(self.expiry.errors())
            .chain(self.amount.errors())
            .collect()
    }

    /// Errors attributed to a single field.
    pub fn errors_for(&self, field: Field) -> Vec<&FieldError> {
        self.errors()
            .into_iter()
            .filter(|error| error.field() == field)
            .collect()
    }

    /// The error stack as display messages.
    pub fn messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    /// The amount to convert, present only if the whole submission is valid.
    pub fn accepted_amount(&self) -> Option<Amount> {
        if !self.is_valid() {
            return None;
        }
        self.amount.value().copied()
    }

    /// Values stored from this submission.
    ///
    /// A field is stored only once it validates. The card number is masked.
    pub fn stored_values(&self) -> StoredValues {
        StoredValues {
            card_number: self.card.value().map(CardNumber::masked),
            expiration_month: self.expiry.value().map(ExpiryDate::month_str),
            expiration_year: self.expiry.value().map(ExpiryDate::year_str),
            amount: self.amount.value().map(Amount::huf),
        }
    }
}

/// Echo of the normalized values kept from a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoredValues {
    /// Masked card number.
    pub card_number: Option<String>,
    /// Two-digit month.
    pub expiration_month: Option<String>,
    /// Two-digit year.
    pub expiration_year: Option<String>,
    /// Amount in HUF.
    pub amount: Option<u64>,
}

/// Validates whole payment submissions.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use payment_form::clock::FixedClock;
/// use payment_form::form::{PaymentFormValidator, PaymentSubmission};
///
/// let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let validator = PaymentFormValidator::with_clock(FixedClock(now));
///
/// let submission = PaymentSubmission::new("4539148803436467", "12", "30", "1000");
/// let report = validator.validate(&submission);
/// assert!(report.is_valid());
/// assert!(report.errors().is_empty());
///
/// let report = validator.validate(&PaymentSubmission::new("4539148803436460", "05", "24", "1.5"));
/// assert!(!report.is_valid());
/// assert_eq!(report.errors().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct PaymentFormValidator<C = SystemClock> {
    limits: AmountLimits,
    clock: C,
}

impl PaymentFormValidator<SystemClock> {
    /// Creates a validator with default limits and the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for PaymentFormValidator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> PaymentFormValidator<C> {
    /// Creates a validator with default limits and the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            limits: AmountLimits::default(),
            clock,
        }
    }

    /// Replaces the amount limits.
    pub fn limits(mut self, limits: AmountLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns the configured amount limits.
    #[inline]
    pub fn amount_limits(&self) -> &AmountLimits {
        &self.limits
    }

    /// Validates all fields of `submission`.
    pub fn validate(&self, submission: &PaymentSubmission) -> FormReport {
        let card: ValidationOutcome<CardNumber> =
            required(&submission.card_number, Field::CardNumber)
                .and_then(validate_card_number)
                .into();

        let expiry: ValidationOutcome<ExpiryDate> =
            required(&submission.expiration_month, Field::ExpirationMonth)
                .and_then(|mm| {
                    let yy = required(&submission.expiration_year, Field::ExpirationYear)?;
                    validate_expiry(mm, yy, &self.clock)
                })
                .into();

        let amount: ValidationOutcome<Amount> = required(&submission.amount, Field::Amount)
            .and_then(|raw| validate_amount(raw, &self.limits))
            .into();

        FormReport {
            card,
            expiry,
            amount,
        }
    }
}

fn required(value: &str, field: Field) -> Result<&str, FieldError> {
    if value.is_empty() {
        Err(FieldError::Missing(field))
    } else {
        Ok(value)
    }
}
