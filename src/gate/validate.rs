//! Local checks run before the record store is consulted.

use super::{AuthForm, GateError};
use crate::store::LookupKey;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

/// Optional `+`, a non-zero leading digit and 1 to 14 more digits.
// `[0-9]` rather than `\d`: the regex crate's `\d` also matches non-ASCII digits.
pub const PHONE_PATTERN: &str = r"^\+?[1-9][0-9]{1,14}$";

/// Format used for the `geburtsdatum` lookup column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[must_use]
pub fn valid_phone_number(phone: &str) -> bool {
    Regex::new(PHONE_PATTERN).is_ok_and(|re| re.is_match(phone))
}

/// Parse a birth date into a UTC calendar date.
///
/// Accepts `YYYY-MM-DD` (what a date input submits) and RFC 3339 timestamps,
/// which are converted to UTC before the date is taken.
#[must_use]
pub fn parse_date_of_birth(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
        })
}

#[must_use]
pub fn normalize_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Check the form and build the lookup key.
///
/// # Errors
/// Returns the first failing check, in order: phone format, missing birth
/// date, unparseable or not-in-the-past birth date.
pub fn validate(form: &AuthForm, today: NaiveDate) -> Result<LookupKey, GateError> {
    if !valid_phone_number(&form.phone_number) {
        return Err(GateError::InvalidPhoneNumber);
    }

    if form.date_of_birth.is_empty() {
        return Err(GateError::MissingDateOfBirth);
    }

    let birth_date = parse_date_of_birth(&form.date_of_birth)
        .filter(|date| *date < today)
        .ok_or(GateError::InvalidDateOfBirth)?;

    Ok(LookupKey {
        sender: form.phone_number.clone(),
        geburtsdatum: normalize_date(birth_date),
    })
}
