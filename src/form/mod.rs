//! Typed forms and the field store that edits them.
//!
//! Each form is a plain struct with a field enum, an update command enum and a
//! validation scope. `FieldStore` owns the in-progress values, the initial
//! snapshot to reset to, and the current per-field errors:
//!
//! - `set` applies one update command and live-clears that field's error
//! - `validate` recomputes the whole error set for a scope
//! - `reset` restores the initial snapshot
//!
//! | Module     | Form                                          |
//! |------------|-----------------------------------------------|
//! | `login`    | `LoginForm`                                   |
//! | `register` | `RegisterForm`, two validation steps          |
//! | `request`  | `RequestForm`, with file attachments          |
//! | `wizard`   | state machine over the registration steps     |

pub mod login;
pub mod register;
pub mod request;
pub mod validate;
pub mod wizard;

use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::errors::FormError;
use crate::i18n::{Locale, Message};

pub use login::{LoginField, LoginForm, LoginUpdate};
pub use register::{AccountType, RegisterField, RegisterForm, RegisterStep, RegisterUpdate};
pub use request::{Attachment, RequestField, RequestForm, RequestUpdate};
pub use wizard::RegistrationWizard;

/// Scope for forms validated in a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullScope;

/// The set of fields of one form.
pub trait FieldName: Copy + Ord + Debug + 'static {
    const ALL: &'static [Self];

    /// Wire and input name of the field.
    fn name(self) -> &'static str;

    fn parse(name: &str) -> Result<Self, FormError> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))
    }
}

pub trait Form: Clone + Debug {
    type Field: FieldName;
    type Update;
    type Scope: Copy;

    /// Apply one update and return the field it touched.
    fn apply(&mut self, update: Self::Update) -> Self::Field;

    /// Turn a raw input event into a typed update for `field`.
    fn update_from_input(field: Self::Field, value: InputValue) -> Result<Self::Update, FormError>;

    /// Compute every error for `scope`. Pure.
    fn validate(&self, scope: Self::Scope, locale: Locale) -> FieldErrors<Self::Field>;
}

/// Raw value carried by an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    /// Checkbox-typed inputs report their checked state, not their value.
    Checked(bool),
    Files(Vec<Attachment>),
}

impl InputValue {
    pub(crate) fn into_text(self, field: &'static str) -> Result<String, FormError> {
        match self {
            InputValue::Text(text) => Ok(text),
            _ => Err(FormError::WrongInputKind {
                field: field.to_string(),
                expected: "text",
            }),
        }
    }

    pub(crate) fn into_checked(self, field: &'static str) -> Result<bool, FormError> {
        match self {
            InputValue::Checked(checked) => Ok(checked),
            _ => Err(FormError::WrongInputKind {
                field: field.to_string(),
                expected: "checkbox",
            }),
        }
    }

    pub(crate) fn into_files(self, field: &'static str) -> Result<Vec<Attachment>, FormError> {
        match self {
            InputValue::Files(files) => Ok(files),
            _ => Err(FormError::WrongInputKind {
                field: field.to_string(),
                expected: "file",
            }),
        }
    }
}

/// A user edit addressed by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub name: String,
    pub value: InputValue,
}

impl InputEvent {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: InputValue::Text(value.into()),
        }
    }

    pub fn checkbox(name: impl Into<String>, checked: bool) -> Self {
        Self {
            name: name.into(),
            value: InputValue::Checked(checked),
        }
    }

    pub fn files(name: impl Into<String>, files: Vec<Attachment>) -> Self {
        Self {
            name: name.into(),
            value: InputValue::Files(files),
        }
    }
}

/// Per-field validation messages. Keys are always fields of the same form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<K: Ord> {
    entries: BTreeMap<K, String>,
}

impl<K: Ord> Default for FieldErrors<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: FieldName> FieldErrors<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` when a rule failed.
    pub fn check(&mut self, field: K, outcome: Option<Message>, locale: Locale) {
        if let Some(message) = outcome {
            self.entries.insert(field, message.text(locale));
        }
    }

    pub fn insert(&mut self, field: K, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn remove(&mut self, field: K) -> Option<String> {
        self.entries.remove(&field)
    }

    pub fn get(&self, field: K) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: K) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Holds the in-progress values of one form plus its live errors.
#[derive(Debug, Clone)]
pub struct FieldStore<F: Form> {
    current: F,
    initial: F,
    errors: FieldErrors<F::Field>,
    locale: Locale,
}

impl<F: Form> FieldStore<F> {
    pub fn new(initial: F, locale: Locale) -> Self {
        Self {
            current: initial.clone(),
            initial,
            errors: FieldErrors::new(),
            locale,
        }
    }

    /// Merge one field into the form. Every other field keeps its value.
    pub fn set(&mut self, update: F::Update) {
        let field = self.current.apply(update);
        self.errors.remove(field);
    }

    /// Apply an input event addressed by field name.
    pub fn apply_input(&mut self, event: InputEvent) -> Result<(), FormError> {
        let field = F::Field::parse(&event.name)?;
        let update = F::update_from_input(field, event.value)?;
        self.set(update);
        Ok(())
    }

    /// Replace the error set with a fresh pass over `scope`.
    /// Returns `true` when the scope is clean.
    pub fn validate(&mut self, scope: F::Scope) -> bool {
        self.errors = self.current.validate(scope, self.locale);
        self.errors.is_empty()
    }

    /// Back to the initial snapshot, with no errors.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.errors = FieldErrors::new();
    }

    pub fn values(&self) -> &F {
        &self.current
    }

    pub fn snapshot(&self) -> F {
        self.current.clone()
    }

    pub fn errors(&self) -> &FieldErrors<F::Field> {
        &self.errors
    }

    pub fn error(&self, field: F::Field) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}
