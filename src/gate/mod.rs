//! Access gate in front of the dashboard.
//!
//! A submission is admitted when the phone number and date of birth pass the
//! local checks in [`validate`] and the record store returns exactly one
//! record for the pair. Every failure is terminal for the attempt; nothing is
//! retried.

pub mod validate;
pub mod view;

pub use self::validate::validate;
pub use self::view::{Field, Session, ViewState};

use crate::store::{LookupError, RecordStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

/// Form fields as submitted by the visitor.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthForm {
    #[serde(default)]
    #[schema(example = "+15551234567")]
    pub phone_number: String,
    #[serde(default)]
    #[schema(example = "1990-05-02")]
    pub date_of_birth: String,
}

impl AuthForm {
    #[must_use]
    pub fn new(phone_number: impl Into<String>, date_of_birth: impl Into<String>) -> Self {
        Self {
            phone_number: phone_number.into(),
            date_of_birth: date_of_birth.into(),
        }
    }
}

/// Reasons a submission is turned away. The `Display` text is what the
/// visitor sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Please enter a valid phone number")]
    InvalidPhoneNumber,
    #[error("Please enter a date of birth")]
    MissingDateOfBirth,
    #[error("Please enter a valid date of birth")]
    InvalidDateOfBirth,
    #[error("No matching user found")]
    NoMatchingUser,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Rejected locally, the record store was not contacted.
    Validation,
    /// The record store did not yield exactly one record.
    Lookup,
}

impl GateError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPhoneNumber | Self::MissingDateOfBirth | Self::InvalidDateOfBirth => {
                ErrorKind::Validation
            }
            Self::NoMatchingUser => ErrorKind::Lookup,
        }
    }
}

/// Run the gate for one submission.
///
/// `today` is the UTC calendar date the birth date must precede.
///
/// # Errors
/// Returns the first failed check, or [`GateError::NoMatchingUser`] when the
/// lookup errors or does not match exactly one record.
#[instrument(skip_all)]
pub async fn admit(
    form: &AuthForm,
    store: &dyn RecordStore,
    today: NaiveDate,
) -> Result<(), GateError> {
    let key = validate(form, today)?;

    debug!(geburtsdatum = %key.geburtsdatum, "looking up record");

    match store.find_single(&key).await {
        Ok(_record) => {
            info!("record matched, access granted");
            Ok(())
        }
        Err(err) => {
            log_lookup_error(&err);
            Err(GateError::NoMatchingUser)
        }
    }
}

// The visitor only ever sees `NoMatchingUser`; keep the real cause in the logs.
fn log_lookup_error(err: &LookupError) {
    if err.is_no_match() {
        info!("record lookup rejected: {}", err);
    } else {
        error!("record lookup failed: {}", err);
    }
}
