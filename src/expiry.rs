//! Card expiration date validation.
//!
//! The form submits the month and the year as two separate two-digit fields.
//! The year is interpreted as `2000 + YY`. A card stays valid until the last
//! day of its expiration month at 23:59:59 local time.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use payment_form::clock::FixedClock;
//! use payment_form::expiry::validate_expiry;
//!
//! let clock = FixedClock(
//!     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap(),
//! );
//!
//! let expiry = validate_expiry("07", "24", &clock).unwrap();
//! assert_eq!(expiry.month(), 7);
//! assert_eq!(expiry.year(), 2024);
//!
//! assert!(validate_expiry("05", "24", &clock).is_err());
//! ```

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::clock::Clock;
use crate::error::FieldError;

/// A validated expiration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiryDate {
    /// Four-digit year (e.g., 2030). Declared first so ordering is chronological.
    year: u16,
    /// Month (1-12)
    month: u8,
}

impl ExpiryDate {
    /// Creates a new expiry date.
    ///
    /// Returns `None` if the month is not 1-12 or the year is outside 2000-2099.
    pub fn new(month: u8, year: u16) -> Option<Self> {
        if !(1..=12).contains(&month) || !(2000..=2099).contains(&year) {
            return None;
        }
        Some(Self { year, month })
    }

    /// Returns the month (1-12).
    #[inline]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the four-digit year.
    #[inline]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the normalized two-digit month, e.g. `"07"`.
    pub fn month_str(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Returns the normalized two-digit year, e.g. `"30"`.
    pub fn year_str(&self) -> String {
        format!("{:02}", self.year % 100)
    }

    /// Returns the last instant at which the card is still valid.
    pub fn last_valid_instant(&self) -> Option<NaiveDateTime> {
        let day = days_in_month(self.year, self.month);
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, day as u32)?
            .and_hms_opt(23, 59, 59)
    }

    /// Checks this date against `now`, returning the matching expiration error.
    ///
    /// Only the current month needs a day-level comparison; any later month
    /// is accepted outright.
    pub fn check_not_expired(&self, now: NaiveDateTime) -> Result<(), FieldError> {
        let current_year = now.year();
        let current_month = now.month();
        let year = self.year as i32;
        let month = self.month as u32;

        if year < current_year {
            return Err(FieldError::ExpiredYear);
        }
        if year == current_year {
            if month < current_month {
                return Err(FieldError::ExpiredMonth);
            }
            if month == current_month {
                match self.last_valid_instant() {
                    Some(deadline) if now <= deadline => {}
                    _ => return Err(FieldError::Expired),
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Gregorian leap-year rule.
#[inline]
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`.
#[inline]
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Parses the month field. Only the exact strings `"01"` to `"12"` are accepted.
pub fn parse_month(mm: &str) -> Result<u8, FieldError> {
    let bytes = mm.as_bytes();
    if bytes.len() != 2 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(FieldError::MonthFormat);
    }

    let month = (bytes[0] - b'0') * 10 + (bytes[1] - b'0');
    if !(1..=12).contains(&month) {
        return Err(FieldError::MonthInvalid);
    }

    Ok(month)
}

/// Parses the year field into a four-digit year (`2000 + YY`).
pub fn parse_year(yy: &str) -> Result<u16, FieldError> {
    if yy.len() != 2 {
        return Err(FieldError::YearLength(yy.to_string()));
    }

    let bytes = yy.as_bytes();
    if !bytes.iter().all(u8::is_ascii_digit) {
        return Err(FieldError::YearFormat);
    }

    Ok(2000 + ((bytes[0] - b'0') as u16) * 10 + (bytes[1] - b'0') as u16)
}

/// Validates the month and year fields against the current time of `clock`.
///
/// Checks run in order (month format, month range, year length, year
/// format, expiration) and the first failure is returned.
pub fn validate_expiry<C: Clock + ?Sized>(
    mm: &str,
    yy: &str,
    clock: &C,
) -> Result<ExpiryDate, FieldError> {
    let month = parse_month(mm)?;
    let year = parse_year(yy)?;

    let expiry = ExpiryDate { year, month };
    expiry.check_not_expired(clock.now())?;

    Ok(expiry)
}
