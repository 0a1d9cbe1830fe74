//! Single-owner view state for the access form.

use super::{AuthForm, GateError, admit};
use crate::store::RecordStore;
use chrono::{NaiveDate, Utc};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Unauthenticated,
    /// Terminal: there is no logout and no expiry.
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PhoneNumber,
    DateOfBirth,
}

/// Form contents, the latest error and the session flag of one view.
///
/// Event handlers take `&mut self`, so one view never runs two submissions at
/// once. Dropping a pending [`ViewState::submit`] future cancels the lookup.
#[derive(Debug, Default)]
pub struct ViewState {
    form: AuthForm,
    error: Option<GateError>,
    session: Session,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_form(form: AuthForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn form(&self) -> &AuthForm {
        &self.form
    }

    #[must_use]
    pub fn error(&self) -> Option<&GateError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.session
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session == Session::Authenticated
    }

    /// Update one form field. Any displayed error is cleared.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::PhoneNumber => self.form.phone_number = value,
            Field::DateOfBirth => self.form.date_of_birth = value,
        }
        self.error = None;
    }

    /// Submit the current form against `store`, judging the birth date
    /// against `today`.
    ///
    /// The previous error is cleared before anything else runs. A view that
    /// is already authenticated stays so and issues no lookup.
    ///
    /// # Errors
    /// Returns the [`GateError`] that is now also held as the latest error.
    pub async fn submit(
        &mut self,
        store: &dyn RecordStore,
        today: NaiveDate,
    ) -> Result<(), GateError> {
        self.error = None;

        if self.is_authenticated() {
            return Ok(());
        }

        match admit(&self.form, store, today).await {
            Ok(()) => {
                self.session = Session::Authenticated;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// [`ViewState::submit`] against the current UTC date.
    ///
    /// # Errors
    /// See [`ViewState::submit`].
    pub async fn submit_now(&mut self, store: &dyn RecordStore) -> Result<(), GateError> {
        self.submit(store, Utc::now().date_naive()).await
    }
}
