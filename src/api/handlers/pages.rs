//! HTML routes. Each request starts from a fresh view, so admission is never
//! remembered between page loads.

use super::rejection_status;
use crate::api::{SharedStore, render};
use crate::gate::{AuthForm, ViewState};
use axum::{
    Form,
    extract::{Extension, rejection::FormRejection},
    http::StatusCode,
    response::Html,
};
use tracing::{debug, instrument};

/// Render the empty access form.
pub async fn login() -> Html<String> {
    Html(render::page(&ViewState::new()))
}

/// Handle a form post: the dashboard on success, otherwise the form again with
/// the entered values and the error.
#[instrument(skip(store, form))]
pub async fn submit(
    Extension(store): Extension<SharedStore>,
    form: Result<Form<AuthForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Failed to parse access form: {}", rejection);
            AuthForm::default()
        }
    };

    let mut view = ViewState::with_form(form);

    let status = match view.submit_now(store.as_ref()).await {
        Ok(()) => StatusCode::OK,
        Err(err) => rejection_status(&err),
    };

    (status, Html(render::page(&view)))
}
