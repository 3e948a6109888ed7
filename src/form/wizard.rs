//! Two-step registration as an explicit state machine.
//!
//! ```text
//!   Identity --advance [identity valid]--> Credentials
//!   Credentials --back--> Identity
//!   Credentials --submit [credentials valid]--> (controller)
//! ```
//!
//! A failed guard leaves the machine where it was and populates the store's
//! errors for the current step.

use super::{FieldStore, RegisterForm, RegisterStep};
use crate::i18n::Locale;

#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: RegisterStep,
    store: FieldStore<RegisterForm>,
}

impl RegistrationWizard {
    pub fn new(locale: Locale) -> Self {
        Self::with_form(RegisterForm::default(), locale)
    }

    pub fn with_form(form: RegisterForm, locale: Locale) -> Self {
        Self {
            step: RegisterStep::Identity,
            store: FieldStore::new(form, locale),
        }
    }

    pub fn step(&self) -> RegisterStep {
        self.step
    }

    pub fn store(&self) -> &FieldStore<RegisterForm> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FieldStore<RegisterForm> {
        &mut self.store
    }

    /// Move from Identity to Credentials when the identity fields are valid.
    /// Returns the step the machine is in afterwards.
    pub fn advance(&mut self) -> RegisterStep {
        if self.step == RegisterStep::Identity && self.store.validate(RegisterStep::Identity) {
            self.step = RegisterStep::Credentials;
        }
        self.step
    }

    pub fn back(&mut self) -> RegisterStep {
        self.step = RegisterStep::Identity;
        self.step
    }

    /// Guard for submission: only from Credentials, only with valid credentials.
    pub fn ready_to_submit(&mut self) -> bool {
        self.step == RegisterStep::Credentials && self.store.validate(RegisterStep::Credentials)
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.step = RegisterStep::Identity;
    }
}
