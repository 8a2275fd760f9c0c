//! HUF to EUR currency conversion.
//!
//! Conversion sits behind the [`CurrencyConverter`] trait so the validation
//! core never touches the network. [`CurrConvClient`] (feature `currconv`)
//! queries the currconv.com API. [`FixedRateConverter`] applies a known rate.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::amount::Amount;
use crate::error::ConversionError;

/// Source currency code.
pub const SOURCE_CURRENCY: &str = "HUF";

/// Target currency code.
pub const TARGET_CURRENCY: &str = "EUR";

/// Returns the currency pair key used by the exchange-rate API, `HUF_EUR`.
pub fn currency_pair() -> String {
    format!("{SOURCE_CURRENCY}_{TARGET_CURRENCY}")
}

/// A converted amount in euros, rounded to two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct EuroAmount(Decimal);

impl EuroAmount {
    /// Converts `amount` at `rate` EUR per HUF, rounding half away from zero.
    ///
    /// Fails with [`ConversionError::InvalidRate`] when the product does not
    /// fit in a `Decimal`.
    pub fn from_rate(amount: Amount, rate: Decimal) -> Result<Self, ConversionError> {
        let total = rate
            .checked_mul(Decimal::from(amount.huf()))
            .ok_or_else(|| ConversionError::InvalidRate(rate.to_string()))?;
        Ok(Self(total.round_dp_with_strategy(
            2,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Returns the rounded decimal value.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Formats with the euro symbol, e.g. `"2.57 €"`.
    pub fn with_symbol(&self) -> String {
        format!("{self} €")
    }
}

impl fmt::Display for EuroAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Converts validated HUF amounts to EUR.
#[async_trait]
pub trait CurrencyConverter: Send + Sync {
    /// Converts `amount` to euros.
    async fn convert(&self, amount: Amount) -> Result<EuroAmount, ConversionError>;
}

/// Converter with a fixed HUF to EUR rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRateConverter {
    rate: Decimal,
}

impl FixedRateConverter {
    /// Creates a converter. Returns `None` unless `rate` is positive.
    pub fn new(rate: Decimal) -> Option<Self> {
        if rate <= Decimal::ZERO {
            return None;
        }
        Some(Self { rate })
    }

    /// Returns the configured rate.
    #[inline]
    pub const fn rate(&self) -> Decimal {
        self.rate
    }
}

#[async_trait]
impl CurrencyConverter for FixedRateConverter {
    async fn convert(&self, amount: Amount) -> Result<EuroAmount, ConversionError> {
        EuroAmount::from_rate(amount, self.rate)
    }
}

/// Extracts the `pair` rate from a compact exchange-rate response body.
///
/// Expects a JSON object such as `{"HUF_EUR":0.002571}`.
pub fn rate_from_response(body: &str, pair: &str) -> Result<Decimal, ConversionError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ConversionError::MalformedResponse(e.to_string()))?;

    let object = value.as_object().ok_or_else(|| {
        ConversionError::MalformedResponse("expected a JSON object".to_string())
    })?;

    let raw = object
        .get(pair)
        .ok_or_else(|| ConversionError::MissingRate(pair.to_string()))?;

    let number = match raw {
        serde_json::Value::Number(number) => number.to_string(),
        other => {
            return Err(ConversionError::MalformedResponse(format!(
                "rate is not a number: {other}"
            )))
        }
    };

    let rate = Decimal::from_str(&number)
        .or_else(|_| Decimal::from_scientific(&number))
        .map_err(|e| ConversionError::MalformedResponse(e.to_string()))?;

    if rate <= Decimal::ZERO {
        return Err(ConversionError::InvalidRate(rate.to_string()));
    }

    Ok(rate)
}

#[cfg(feature = "currconv")]
pub use client::CurrConvClient;

#[cfg(feature = "currconv")]
mod client {
    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use super::{currency_pair, rate_from_response, CurrencyConverter, EuroAmount};
    use crate::amount::Amount;
    use crate::config::ConverterConfig;
    use crate::error::ConversionError;

    /// HTTP client for the currconv.com `convert` endpoint.
    ///
    /// Sends one GET per conversion, bounded by the configured timeout. There
    /// are no retries.
    #[derive(Debug, Clone)]
    pub struct CurrConvClient {
        http: reqwest::Client,
        endpoint: String,
        api_key: String,
    }

    impl CurrConvClient {
        /// Builds a client from converter configuration.
        pub fn new(config: &ConverterConfig) -> Result<Self, ConversionError> {
            let http = reqwest::Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| ConversionError::Unavailable(e.to_string()))?;

            Ok(Self {
                http,
                endpoint: config.endpoint.clone(),
                api_key: config.api_key.clone().unwrap_or_default(),
            })
        }

        /// Fetches the current HUF to EUR rate.
        pub async fn fetch_rate(&self) -> Result<Decimal, ConversionError> {
            let pair = currency_pair();
            tracing::debug!(endpoint = %self.endpoint, %pair, "requesting exchange rate");

            let response = self
                .http
                .get(&self.endpoint)
                .query(&[
                    ("q", pair.as_str()),
                    ("compact", "ultra"),
                    ("apiKey", self.api_key.as_str()),
                ])
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| ConversionError::Unavailable(e.without_url().to_string()))?;

            let body = response
                .text()
                .await
                .map_err(|e| ConversionError::Unavailable(e.without_url().to_string()))?;

            rate_from_response(&body, &pair)
        }
    }

    #[async_trait]
    impl CurrencyConverter for CurrConvClient {
        async fn convert(&self, amount: Amount) -> Result<EuroAmount, ConversionError> {
            let rate = self.fetch_rate().await?;
            EuroAmount::from_rate(amount, rate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::{validate_amount, AmountLimits};
    use rust_decimal_macros::dec;

    fn huf(value: &str) -> Amount {
        validate_amount(value, &AmountLimits::default()).unwrap()
    }

    #[test]
    fn test_euro_amount_formatting() {
        let eur = EuroAmount::from_rate(huf("1000"), dec!(0.002571)).unwrap();
        assert_eq!(eur.to_string(), "2.57");
        assert_eq!(eur.with_symbol(), "2.57 €");

        let eur = EuroAmount::from_rate(huf("1000"), dec!(0.003)).unwrap();
        assert_eq!(eur.to_string(), "3.00");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 1 * 0.005 = 0.005 rounds up to 0.01, not down to the even 0.00.
        let eur = EuroAmount::from_rate(huf("1"), dec!(0.005)).unwrap();
        assert_eq!(eur.to_string(), "0.01");
    }

    #[test]
    fn test_rate_from_response() {
        let rate = rate_from_response(r#"{"HUF_EUR":0.002571}"#, "HUF_EUR").unwrap();
        assert_eq!(rate, dec!(0.002571));

        let rate = rate_from_response(r#"{"HUF_EUR":2.571e-3}"#, "HUF_EUR").unwrap();
        assert_eq!(rate, dec!(0.002571));
    }

    #[test]
    fn test_rate_from_response_errors() {
        assert!(matches!(
            rate_from_response("not json", "HUF_EUR"),
            Err(ConversionError::MalformedResponse(_))
        ));
        assert!(matches!(
            rate_from_response("[1, 2]", "HUF_EUR"),
            Err(ConversionError::MalformedResponse(_))
        ));
        assert_eq!(
            rate_from_response(r#"{"USD_EUR":0.9}"#, "HUF_EUR"),
            Err(ConversionError::MissingRate("HUF_EUR".into()))
        );
        assert!(matches!(
            rate_from_response(r#"{"HUF_EUR":"0.0025"}"#, "HUF_EUR"),
            Err(ConversionError::MalformedResponse(_))
        ));
        assert!(matches!(
            rate_from_response(r#"{"HUF_EUR":0}"#, "HUF_EUR"),
            Err(ConversionError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_overflowing_rate_is_rejected() {
        // Accepted as a positive rate, but 1000 times it exceeds Decimal::MAX.
        let rate = rate_from_response(r#"{"HUF_EUR":7.9e28}"#, "HUF_EUR").unwrap();
        assert_eq!(
            EuroAmount::from_rate(huf("1000"), rate),
            Err(ConversionError::InvalidRate(rate.to_string()))
        );
        assert!(EuroAmount::from_rate(huf("1"), rate).is_ok());
    }

    #[tokio::test]
    async fn test_fixed_rate_overflow_is_conversion_error() {
        let converter = FixedRateConverter::new(Decimal::MAX).unwrap();
        assert!(matches!(
            converter.convert(huf("2")).await,
            Err(ConversionError::InvalidRate(_))
        ));
    }

    #[test]
    fn test_currency_pair() {
        assert_eq!(currency_pair(), "HUF_EUR");
    }

    #[tokio::test]
    async fn test_fixed_rate_converter() {
        let converter = FixedRateConverter::new(dec!(0.0025)).unwrap();
        let eur = converter.convert(huf("1000")).await.unwrap();
        assert_eq!(eur.with_symbol(), "2.50 €");
        assert!(FixedRateConverter::new(Decimal::ZERO).is_none());
    }
}
