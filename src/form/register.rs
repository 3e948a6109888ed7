//! Account registration form.
//!
//! Validation is split in two steps: identity fields first, then credentials.
//! `RegistrationWizard` drives the steps; this module only knows the rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::validate::{self, REGISTER_PASSWORD_MIN};
use super::{FieldErrors, FieldName, Form, InputValue};
use crate::errors::FormError;
use crate::i18n::{Locale, Message};

pub const DEFAULT_ROLE: &str = "citoyen";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    #[default]
    Individual,
    Organization,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Organization => "organization",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "organization" => Ok(Self::Organization),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub organization: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub account_type: AccountType,
    pub role: String,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone_number: String::new(),
            organization: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            accept_terms: false,
            account_type: AccountType::default(),
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegisterField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Organization,
    Password,
    ConfirmPassword,
    AcceptTerms,
    AccountType,
    Role,
}

impl FieldName for RegisterField {
    const ALL: &'static [Self] = &[
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::PhoneNumber,
        Self::Organization,
        Self::Password,
        Self::ConfirmPassword,
        Self::AcceptTerms,
        Self::AccountType,
        Self::Role,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Organization => "organization",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::AcceptTerms => "acceptTerms",
            Self::AccountType => "accountType",
            Self::Role => "role",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterUpdate {
    FirstName(String),
    LastName(String),
    Email(String),
    PhoneNumber(String),
    Organization(String),
    Password(String),
    ConfirmPassword(String),
    AcceptTerms(bool),
    AccountType(AccountType),
    Role(String),
}

/// Validation scope: which step of the registration is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterStep {
    /// Names, email and phone.
    Identity,
    /// Password, confirmation and terms acceptance.
    Credentials,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
    pub account_type: AccountType,
    pub role: String,
}

impl RegisterForm {
    /// Request body; the organization is only sent when filled in.
    pub fn payload(&self) -> RegisterPayload {
        RegisterPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            organization: (!self.organization.is_empty()).then(|| self.organization.clone()),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            accept_terms: self.accept_terms,
            account_type: self.account_type,
            role: self.role.clone(),
        }
    }
}

impl Form for RegisterForm {
    type Field = RegisterField;
    type Update = RegisterUpdate;
    type Scope = RegisterStep;

    fn apply(&mut self, update: RegisterUpdate) -> RegisterField {
        use RegisterUpdate as U;
        match update {
            U::FirstName(v) => {
                self.first_name = v;
                RegisterField::FirstName
            }
            U::LastName(v) => {
                self.last_name = v;
                RegisterField::LastName
            }
            U::Email(v) => {
                self.email = v;
                RegisterField::Email
            }
            U::PhoneNumber(v) => {
                self.phone_number = v;
                RegisterField::PhoneNumber
            }
            U::Organization(v) => {
                self.organization = v;
                RegisterField::Organization
            }
            U::Password(v) => {
                self.password = v;
                RegisterField::Password
            }
            U::ConfirmPassword(v) => {
                self.confirm_password = v;
                RegisterField::ConfirmPassword
            }
            U::AcceptTerms(v) => {
                self.accept_terms = v;
                RegisterField::AcceptTerms
            }
            U::AccountType(v) => {
                self.account_type = v;
                RegisterField::AccountType
            }
            U::Role(v) => {
                self.role = v;
                RegisterField::Role
            }
        }
    }

    fn update_from_input(
        field: RegisterField,
        value: InputValue,
    ) -> Result<RegisterUpdate, FormError> {
        use RegisterUpdate as U;
        let name = field.name();
        Ok(match field {
            RegisterField::FirstName => U::FirstName(value.into_text(name)?),
            RegisterField::LastName => U::LastName(value.into_text(name)?),
            RegisterField::Email => U::Email(value.into_text(name)?),
            RegisterField::PhoneNumber => U::PhoneNumber(value.into_text(name)?),
            RegisterField::Organization => U::Organization(value.into_text(name)?),
            RegisterField::Password => U::Password(value.into_text(name)?),
            RegisterField::ConfirmPassword => U::ConfirmPassword(value.into_text(name)?),
            RegisterField::AcceptTerms => U::AcceptTerms(value.into_checked(name)?),
            RegisterField::AccountType => {
                let raw = value.into_text(name)?;
                let kind = raw.parse().map_err(|_| FormError::InvalidChoice {
                    field: name.to_string(),
                    value: raw.clone(),
                })?;
                U::AccountType(kind)
            }
            RegisterField::Role => U::Role(value.into_text(name)?),
        })
    }

    fn validate(&self, step: RegisterStep, locale: Locale) -> FieldErrors<RegisterField> {
        let mut errors = FieldErrors::new();
        match step {
            RegisterStep::Identity => {
                errors.check(
                    RegisterField::FirstName,
                    validate::required(&self.first_name, Message::FirstNameRequired),
                    locale,
                );
                errors.check(
                    RegisterField::LastName,
                    validate::required(&self.last_name, Message::LastNameRequired),
                    locale,
                );
                errors.check(RegisterField::Email, validate::email(&self.email), locale);
                errors.check(
                    RegisterField::PhoneNumber,
                    validate::required(&self.phone_number, Message::PhoneRequired),
                    locale,
                );
            }
            RegisterStep::Credentials => {
                errors.check(
                    RegisterField::Password,
                    validate::password(&self.password, REGISTER_PASSWORD_MIN),
                    locale,
                );
                errors.check(
                    RegisterField::ConfirmPassword,
                    validate::confirmation(&self.password, &self.confirm_password),
                    locale,
                );
                errors.check(
                    RegisterField::AcceptTerms,
                    validate::accepted(self.accept_terms, Message::TermsRequired),
                    locale,
                );
            }
        }
        errors
    }
}
