//! Serializable rendering of a processed submission.
//!
//! This is the output boundary shared by the server and the CLI.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::Field;
use crate::form::{FormReport, StoredValues};
use crate::processor::{Conversion, PaymentOutcome};

/// Everything shown to the user after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentView {
    /// True iff every field validated.
    pub accepted: bool,
    /// Messages keyed by form field name. Fields without errors are omitted.
    pub field_errors: BTreeMap<&'static str, Vec<String>>,
    /// All messages in validation order.
    pub errors: Vec<String>,
    /// Echo of the stored values.
    pub stored: StoredValues,
    /// Converted amount with the euro symbol, e.g. `"2.57 €"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_eur: Option<String>,
    /// Why conversion failed, when it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_error: Option<String>,
}

impl PaymentView {
    /// Renders a validation-only report.
    pub fn from_report(report: &FormReport) -> Self {
        let field_errors = Field::ALL
            .iter()
            .filter_map(|&field| {
                let messages: Vec<String> = report
                    .errors_for(field)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                (!messages.is_empty()).then_some((field.form_name(), messages))
            })
            .collect();

        Self {
            accepted: report.is_valid(),
            field_errors,
            errors: report.messages(),
            stored: report.stored_values(),
            amount_eur: None,
            conversion_error: None,
        }
    }

    /// Returns true if the conversion step failed.
    pub fn conversion_failed(&self) -> bool {
        self.conversion_error.is_some()
    }
}

impl From<&PaymentOutcome> for PaymentView {
    fn from(outcome: &PaymentOutcome) -> Self {
        let mut view = Self::from_report(&outcome.report);
        match &outcome.conversion {
            Conversion::NotAttempted => {}
            Conversion::Converted(eur) => view.amount_eur = Some(eur.with_symbol()),
            Conversion::Failed(e) => view.conversion_error = Some(e.to_string()),
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::form::{PaymentFormValidator, PaymentSubmission};
    use chrono::NaiveDate;

    fn report(submission: PaymentSubmission) -> FormReport {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        PaymentFormValidator::with_clock(FixedClock(now)).validate(&submission)
    }

    #[test]
    fn test_field_errors_keyed_by_form_name() {
        let view = PaymentView::from_report(&report(PaymentSubmission::new(
            "123", "05", "24", "-3",
        )));
        assert!(!view.accepted);
        assert_eq!(view.field_errors.len(), 3);
        assert_eq!(
            view.field_errors["cc-number"],
            vec!["The card number must be 16 digits long. Yours is 3."]
        );
        assert_eq!(
            view.field_errors["expiration-month"],
            vec!["Card is expired! Expired month(s)."]
        );
        assert_eq!(
            view.field_errors["amount-huf"],
            vec!["Amount: Only positive numbers!"]
        );
        assert_eq!(view.errors.len(), 3);
    }

    #[test]
    fn test_json_shape() {
        let view = PaymentView::from_report(&report(PaymentSubmission::new(
            "4539148803436467",
            "12",
            "30",
            "1000",
        )));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["accepted"], true);
        assert_eq!(json["errors"].as_array().unwrap().len(), 0);
        assert_eq!(json["stored"]["card_number"], "****-****-****-6467");
        assert_eq!(json["stored"]["amount"], 1000);
        assert!(json.get("amount_eur").is_none());
    }
}
