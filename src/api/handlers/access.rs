use super::rejection_status;
use crate::api::SharedStore;
use crate::gate::{AuthForm, ErrorKind, GateError, ViewState};
use crate::integrations::{self, IntegrationCard};
use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccessGranted {
    pub authenticated: bool,
    pub integrations: Vec<IntegrationCard>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct AccessDenied {
    pub authenticated: bool,
    pub kind: ErrorKind,
    pub error: String,
}

impl From<&GateError> for AccessDenied {
    fn from(err: &GateError) -> Self {
        Self {
            authenticated: false,
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

type AccessResponse = Result<(StatusCode, Json<AccessGranted>), (StatusCode, Json<AccessDenied>)>;

#[utoipa::path(
    post,
    path= "/v1/access",
    request_body = AuthForm,
    responses (
        (status = 200, description = "Access granted, dashboard contents", body = AccessGranted),
        (status = 400, description = "Phone number or date of birth rejected", body = AccessDenied),
        (status = 401, description = "No matching user found", body = AccessDenied),
        (status = 422, description = "Request body does not match the form", body = AccessDenied),
        (status = 415, description = "Request body is not JSON", body = AccessDenied),
    ),
    tag = "access",
)]
/// Run the access gate for a JSON submission.
#[instrument(skip(store, payload))]
pub async fn access(
    Extension(store): Extension<SharedStore>,
    payload: Result<Json<AuthForm>, JsonRejection>,
) -> AccessResponse {
    let Json(form) = payload.map_err(|rejection| {
        debug!("Failed to parse access request: {}", rejection);
        (
            rejection.status(),
            Json(AccessDenied {
                authenticated: false,
                kind: ErrorKind::Validation,
                error: rejection.body_text(),
            }),
        )
    })?;

    let mut view = ViewState::with_form(form);

    match view.submit_now(store.as_ref()).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(AccessGranted {
                authenticated: view.is_authenticated(),
                integrations: integrations::cards(),
            }),
        )),
        Err(err) => Err((rejection_status(&err), Json(AccessDenied::from(&err)))),
    }
}
