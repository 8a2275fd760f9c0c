//! # payment_form
//!
//! Server-side payment intake form validation, with HUF to EUR conversion.
//!
//! ## Features
//!
//! - 16-digit card number validation with the Luhn checksum
//! - Expiration month/year validation against an injectable clock
//! - Amount validation (whole forints, 1 to 1 000 000 by default)
//! - Per-field error reporting with no short-circuiting between fields
//! - HUF to EUR conversion behind a pluggable trait
//! - Interfaces: library, CLI, REST API
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use payment_form::{FixedClock, PaymentFormValidator, PaymentSubmission};
//!
//! let now = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let validator = PaymentFormValidator::with_clock(FixedClock(now));
//!
//! let report = validator.validate(&PaymentSubmission::new(
//!     "4539 1488 0343 6467",
//!     "12",
//!     "30",
//!     "1000",
//! ));
//! assert!(report.is_valid());
//! assert_eq!(report.accepted_amount().unwrap().huf(), 1000);
//!
//! // Every field is checked, so all problems are reported together.
//! let report = validator.validate(&PaymentSubmission::new("4539148803436460", "13", "30", "0"));
//! assert_eq!(
//!     report.messages(),
//!     vec![
//!         "Your card failed to pass Luhn algorithm.",
//!         "Month number is invalid.",
//!         "Amount must be between 1 and 1000000!",
//!     ]
//! );
//! ```
//!
//! ## Conversion
//!
//! ```rust
//! use std::sync::Arc;
//! use rust_decimal::Decimal;
//! use payment_form::{
//!     FixedRateConverter, PaymentFormValidator, PaymentProcessor, PaymentSubmission,
//! };
//!
//! let converter = FixedRateConverter::new(Decimal::new(25, 4)).unwrap();
//! let processor = PaymentProcessor::new(PaymentFormValidator::new(), Arc::new(converter));
//! let submission = PaymentSubmission::new("4539148803436467", "12", "99", "1000");
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let outcome = runtime.block_on(processor.process(&submission));
//! assert_eq!(outcome.conversion.euro().unwrap().with_symbol(), "2.50 €");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `currconv` | HTTP client for the currconv.com API (default) |
//! | `generate` | Random test card generation |
//! | `cli` | Command-line tool |
//! | `server` | REST API with Swagger UI |
//!
//! ## Security
//!
//! - Card digits are held in a fixed-size array, zeroized on drop
//! - `Debug` and `Display` show masked numbers only
//! - Stored-value echoes and logs never contain the full card number
//! - No unsafe code (`#![deny(unsafe_code)]`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod amount;
pub mod card;
pub mod clock;
pub mod config;
pub mod convert;
pub mod error;
pub mod expiry;
pub mod form;
pub mod generate;
pub mod luhn;
pub mod mask;
pub mod processor;
pub mod view;

// Re-export main types at crate root
pub use amount::{validate_amount, Amount, AmountLimits};
pub use card::{is_valid_card_number, validate_card_number, CardNumber, CARD_DIGITS};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use convert::{CurrencyConverter, EuroAmount, FixedRateConverter};
pub use error::{ConfigError, ConversionError, ErrorKind, Field, FieldError};
pub use expiry::{validate_expiry, ExpiryDate};
pub use form::{FormReport, PaymentFormValidator, PaymentSubmission, ValidationOutcome};
pub use processor::{Conversion, PaymentOutcome, PaymentProcessor};
pub use view::PaymentView;

#[cfg(feature = "currconv")]
pub use convert::CurrConvClient;
