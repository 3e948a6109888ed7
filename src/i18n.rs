//! User-facing message catalogue.
//!
//! Validation errors, notifications and fallback error messages are looked up
//! here so the whole client speaks one language, chosen by `[ui] locale`.

use serde::{Deserialize, Serialize};

/// Display language for messages shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Fr => write!(f, "fr"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            _ => anyhow::bail!("Invalid locale '{}'. Valid values: en, fr", s),
        }
    }
}

/// Every message the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    FirstNameRequired,
    LastNameRequired,
    EmailRequired,
    EmailInvalid,
    PhoneRequired,
    PasswordRequired,
    PasswordTooShort(usize),
    PasswordMismatch,
    TermsRequired,
    PropertyTypeRequired,
    LocationRequired,
    DescriptionRequired,
    DocumentUnnamed,
    DocumentTypeRejected,
    ServerError,
    UnknownError,
    LoginSucceeded,
    RegisterSucceeded,
    RequestSubmitted,
    LoggedOut,
    StrengthWeak,
    StrengthMedium,
    StrengthStrong,
    StrengthVeryStrong,
}

impl Message {
    pub fn text(self, locale: Locale) -> String {
        match locale {
            Locale::En => self.english(),
            Locale::Fr => self.french(),
        }
    }

    fn english(self) -> String {
        match self {
            Message::FirstNameRequired => "First name is required".into(),
            Message::LastNameRequired => "Last name is required".into(),
            Message::EmailRequired => "Email is required".into(),
            Message::EmailInvalid => "Invalid email format".into(),
            Message::PhoneRequired => "Phone number is required".into(),
            Message::PasswordRequired => "Password is required".into(),
            Message::PasswordTooShort(min) => {
                format!("Password must be at least {} characters", min)
            }
            Message::PasswordMismatch => "Passwords do not match".into(),
            Message::TermsRequired => "You must accept the terms of use".into(),
            Message::PropertyTypeRequired => "Property type is required".into(),
            Message::LocationRequired => "Location is required".into(),
            Message::DescriptionRequired => "Description is required".into(),
            Message::DocumentUnnamed => "Every document needs a file name".into(),
            Message::DocumentTypeRejected => "Only PDF or image documents are accepted".into(),
            Message::ServerError => "Server error".into(),
            Message::UnknownError => "Unknown error".into(),
            Message::LoginSucceeded => "Signed in successfully!".into(),
            Message::RegisterSucceeded => "Account created successfully!".into(),
            Message::RequestSubmitted => "Request submitted successfully!".into(),
            Message::LoggedOut => "Signed out".into(),
            Message::StrengthWeak => "Weak".into(),
            Message::StrengthMedium => "Medium".into(),
            Message::StrengthStrong => "Strong".into(),
            Message::StrengthVeryStrong => "Very strong".into(),
        }
    }

    fn french(self) -> String {
        match self {
            Message::FirstNameRequired => "Le prénom est requis".into(),
            Message::LastNameRequired => "Le nom est requis".into(),
            Message::EmailRequired => "L'email est requis".into(),
            Message::EmailInvalid => "Format d'email invalide".into(),
            Message::PhoneRequired => "Le téléphone est requis".into(),
            Message::PasswordRequired => "Le mot de passe est requis".into(),
            Message::PasswordTooShort(min) => {
                format!("Le mot de passe doit contenir au moins {} caractères", min)
            }
            Message::PasswordMismatch => "Les mots de passe ne correspondent pas".into(),
            Message::TermsRequired => "Vous devez accepter les conditions d'utilisation".into(),
            Message::PropertyTypeRequired => "Le type de propriété est requis".into(),
            Message::LocationRequired => "La localisation est requise".into(),
            Message::DescriptionRequired => "La description est requise".into(),
            Message::DocumentUnnamed => "Chaque document doit avoir un nom de fichier".into(),
            Message::DocumentTypeRejected => "Seuls les documents PDF ou images sont acceptés".into(),
            Message::ServerError => "Erreur serveur".into(),
            Message::UnknownError => "Erreur inconnue".into(),
            Message::LoginSucceeded => "Connexion réussie !".into(),
            Message::RegisterSucceeded => "Compte créé avec succès !".into(),
            Message::RequestSubmitted => "Demande soumise avec succès !".into(),
            Message::LoggedOut => "Déconnecté".into(),
            Message::StrengthWeak => "Faible".into(),
            Message::StrengthMedium => "Moyen".into(),
            Message::StrengthStrong => "Fort".into(),
            Message::StrengthVeryStrong => "Très fort".into(),
        }
    }
}
