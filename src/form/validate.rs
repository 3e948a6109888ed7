//! Declarative field rules shared by every form.
//!
//! Each rule returns the message to show, or `None` when the value passes.
//! Forms combine rules per field and collect the results into `FieldErrors`.

use regex::Regex;
use std::sync::LazyLock;

use crate::i18n::{Locale, Message};

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Minimum password length on the login form.
pub const LOGIN_PASSWORD_MIN: usize = 6;

/// Minimum password length when creating an account.
pub const REGISTER_PASSWORD_MIN: usize = 8;

pub fn required(value: &str, message: Message) -> Option<Message> {
    value.is_empty().then_some(message)
}

/// Checkbox that must be ticked (terms acceptance).
pub fn accepted(checked: bool, message: Message) -> Option<Message> {
    (!checked).then_some(message)
}

/// Local part, `@`, and a domain containing a dot.
pub fn is_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn email(value: &str) -> Option<Message> {
    required(value, Message::EmailRequired).or_else(|| {
        if is_email(value) {
            None
        } else {
            Some(Message::EmailInvalid)
        }
    })
}

pub fn password(value: &str, min_len: usize) -> Option<Message> {
    required(value, Message::PasswordRequired).or_else(|| {
        if value.chars().count() < min_len {
            Some(Message::PasswordTooShort(min_len))
        } else {
            None
        }
    })
}

/// Confirmation must equal the password exactly.
pub fn confirmation(password: &str, confirm: &str) -> Option<Message> {
    (password != confirm).then_some(Message::PasswordMismatch)
}

/// Score a password from 0 to 4 for the strength meter.
///
/// One point each for: at least 8 characters, an uppercase letter, a digit,
/// and a character that is neither a letter nor a digit. Only ASCII letters
/// and digits count as alphanumeric. The score never blocks submission.
pub fn password_strength(password: &str) -> u8 {
    let mut score = 0;
    if password.chars().count() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score
}

/// Indicator bucket for a strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => StrengthLevel::Weak,
            2 => StrengthLevel::Medium,
            3 => StrengthLevel::Strong,
            _ => StrengthLevel::VeryStrong,
        }
    }

    pub fn of(password: &str) -> Self {
        Self::from_score(password_strength(password))
    }

    pub fn label(self, locale: Locale) -> String {
        match self {
            StrengthLevel::Weak => Message::StrengthWeak,
            StrengthLevel::Medium => Message::StrengthMedium,
            StrengthLevel::Strong => Message::StrengthStrong,
            StrengthLevel::VeryStrong => Message::StrengthVeryStrong,
        }
        .text(locale)
    }
}
