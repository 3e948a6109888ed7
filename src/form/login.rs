use serde::Serialize;

use super::validate::{self, LOGIN_PASSWORD_MIN};
use super::{FieldErrors, FieldName, Form, FullScope, InputValue};
use crate::errors::FormError;
use crate::i18n::Locale;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
    RememberMe,
}

impl FieldName for LoginField {
    const ALL: &'static [Self] = &[Self::Email, Self::Password, Self::RememberMe];

    fn name(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::RememberMe => "rememberMe",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginUpdate {
    Email(String),
    Password(String),
    RememberMe(bool),
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn payload(&self) -> LoginPayload {
        LoginPayload {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

impl Form for LoginForm {
    type Field = LoginField;
    type Update = LoginUpdate;
    type Scope = FullScope;

    fn apply(&mut self, update: LoginUpdate) -> LoginField {
        match update {
            LoginUpdate::Email(v) => {
                self.email = v;
                LoginField::Email
            }
            LoginUpdate::Password(v) => {
                self.password = v;
                LoginField::Password
            }
            LoginUpdate::RememberMe(v) => {
                self.remember_me = v;
                LoginField::RememberMe
            }
        }
    }

    fn update_from_input(field: LoginField, value: InputValue) -> Result<LoginUpdate, FormError> {
        let name = field.name();
        Ok(match field {
            LoginField::Email => LoginUpdate::Email(value.into_text(name)?),
            LoginField::Password => LoginUpdate::Password(value.into_text(name)?),
            LoginField::RememberMe => LoginUpdate::RememberMe(value.into_checked(name)?),
        })
    }

    fn validate(&self, _scope: FullScope, locale: Locale) -> FieldErrors<LoginField> {
        let mut errors = FieldErrors::new();
        errors.check(LoginField::Email, validate::email(&self.email), locale);
        errors.check(
            LoginField::Password,
            validate::password(&self.password, LOGIN_PASSWORD_MIN),
            locale,
        );
        errors
    }
}
