//! Validates a submission and, only when it is accepted, converts the amount.

use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::convert::{CurrencyConverter, EuroAmount};
use crate::error::{ConversionError, Field};
use crate::form::{FormReport, PaymentFormValidator, PaymentSubmission};

/// What happened to the currency conversion step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// Validation failed, so the converter was not called.
    NotAttempted,
    /// The amount was converted.
    Converted(EuroAmount),
    /// The converter was called and failed.
    Failed(ConversionError),
}

impl Conversion {
    /// Returns the converted amount on success.
    pub fn euro(&self) -> Option<&EuroAmount> {
        match self {
            Self::Converted(eur) => Some(eur),
            _ => None,
        }
    }
}

/// Result of processing one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    /// Per-field validation results.
    pub report: FormReport,
    /// Conversion result.
    pub conversion: Conversion,
}

/// Runs the form validator and then the currency converter.
#[derive(Clone)]
pub struct PaymentProcessor<C = SystemClock> {
    validator: PaymentFormValidator<C>,
    converter: Arc<dyn CurrencyConverter>,
}

impl<C: Clock> PaymentProcessor<C> {
    /// Creates a processor from a validator and a converter.
    pub fn new(validator: PaymentFormValidator<C>, converter: Arc<dyn CurrencyConverter>) -> Self {
        Self {
            validator,
            converter,
        }
    }

    /// Returns the underlying validator.
    #[inline]
    pub fn validator(&self) -> &PaymentFormValidator<C> {
        &self.validator
    }

    /// Validates `submission` and converts the amount if every field is valid.
    ///
    /// The converter is called exactly once for an accepted submission and
    /// never for a rejected one.
    pub async fn process(&self, submission: &PaymentSubmission) -> PaymentOutcome {
        let report = self.validator.validate(submission);

        let Some(amount) = report.accepted_amount() else {
            let rejected: Vec<&str> = Field::ALL
                .iter()
                .filter(|field| !report.errors_for(**field).is_empty())
                .map(|field| field.form_name())
                .collect();
            tracing::info!(
                errors = report.errors().len(),
                fields = ?rejected,
                "payment submission rejected"
            );
            return PaymentOutcome {
                report,
                conversion: Conversion::NotAttempted,
            };
        };

        let card = report.card().value().map(|card| card.masked()).unwrap_or_default();
        tracing::debug!(%card, huf = amount.huf(), "payment submission accepted");

        let conversion = match self.converter.convert(amount).await {
            Ok(eur) => {
                tracing::info!(huf = amount.huf(), eur = %eur, "amount converted");
                Conversion::Converted(eur)
            }
            Err(e) => {
                tracing::warn!(huf = amount.huf(), error = %e, "currency conversion failed");
                Conversion::Failed(e)
            }
        };

        PaymentOutcome { report, conversion }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::clock::FixedClock;
    use crate::convert::FixedRateConverter;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    struct Unavailable;

    #[async_trait]
    impl CurrencyConverter for Unavailable {
        async fn convert(&self, _amount: Amount) -> Result<EuroAmount, ConversionError> {
            Err(ConversionError::Unavailable("offline".into()))
        }
    }

    fn validator() -> PaymentFormValidator<FixedClock> {
        let now = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        PaymentFormValidator::with_clock(FixedClock(now))
    }

    #[tokio::test]
    async fn test_accepted_submission_is_converted() {
        let converter = Arc::new(FixedRateConverter::new(dec!(0.0025)).unwrap());
        let processor = PaymentProcessor::new(validator(), converter);
        let outcome = processor
            .process(&PaymentSubmission::new("4539148803436467", "12", "30", "1000"))
            .await;
        assert!(outcome.report.is_valid());
        assert_eq!(outcome.conversion.euro().unwrap().with_symbol(), "2.50 €");
    }

    #[tokio::test]
    async fn test_rejected_submission_is_not_converted() {
        let processor = PaymentProcessor::new(validator(), Arc::new(Unavailable));
        let outcome = processor
            .process(&PaymentSubmission::new("4539148803436460", "12", "30", "1000"))
            .await;
        assert_eq!(outcome.conversion, Conversion::NotAttempted);
    }

    #[tokio::test]
    async fn test_conversion_failure_is_reported() {
        let processor = PaymentProcessor::new(validator(), Arc::new(Unavailable));
        let outcome = processor
            .process(&PaymentSubmission::new("4539148803436467", "12", "30", "1000"))
            .await;
        assert!(outcome.report.is_valid());
        assert_eq!(
            outcome.conversion,
            Conversion::Failed(ConversionError::Unavailable("offline".into()))
        );
    }
}
