pub mod access;
pub mod health;
pub mod pages;

use crate::gate::{ErrorKind, GateError};
use axum::http::StatusCode;

// Shared by the HTML form and the JSON endpoint.
pub(crate) const fn rejection_status(err: &GateError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Lookup => StatusCode::UNAUTHORIZED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_bad_request_lookup_is_unauthorized() {
        assert_eq!(
            rejection_status(&GateError::InvalidPhoneNumber),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_status(&GateError::InvalidDateOfBirth),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_status(&GateError::NoMatchingUser),
            StatusCode::UNAUTHORIZED
        );
    }
}
