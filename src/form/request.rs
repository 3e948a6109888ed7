//! Property-registration request form and its attachments.

use std::path::Path;

use anyhow::{Context, Result};

use super::validate;
use super::{FieldErrors, FieldName, Form, FullScope, InputValue};
use crate::errors::FormError;
use crate::i18n::{Locale, Message};
use crate::models::Urgency;

/// A document picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read a document from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }

    /// PDF or any image type.
    pub fn is_accepted_type(&self) -> bool {
        self.content_type == "application/pdf" || self.content_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub property_type: String,
    pub location: String,
    pub description: String,
    pub urgency: Urgency,
    pub documents: Vec<Attachment>,
    /// Selected agent id; empty means no agent chosen.
    pub agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestField {
    PropertyType,
    Location,
    Description,
    Urgency,
    Documents,
    Agent,
}

impl FieldName for RequestField {
    const ALL: &'static [Self] = &[
        Self::PropertyType,
        Self::Location,
        Self::Description,
        Self::Urgency,
        Self::Documents,
        Self::Agent,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::PropertyType => "propertyType",
            Self::Location => "location",
            Self::Description => "description",
            Self::Urgency => "urgency",
            Self::Documents => "documents",
            Self::Agent => "agent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestUpdate {
    PropertyType(String),
    Location(String),
    Description(String),
    Urgency(Urgency),
    /// Picked files are appended to the ones already attached.
    AddDocuments(Vec<Attachment>),
    RemoveDocument(usize),
    Agent(String),
}

impl Form for RequestForm {
    type Field = RequestField;
    type Update = RequestUpdate;
    type Scope = FullScope;

    fn apply(&mut self, update: RequestUpdate) -> RequestField {
        match update {
            RequestUpdate::PropertyType(v) => {
                self.property_type = v;
                RequestField::PropertyType
            }
            RequestUpdate::Location(v) => {
                self.location = v;
                RequestField::Location
            }
            RequestUpdate::Description(v) => {
                self.description = v;
                RequestField::Description
            }
            RequestUpdate::Urgency(v) => {
                self.urgency = v;
                RequestField::Urgency
            }
            RequestUpdate::AddDocuments(files) => {
                self.documents.extend(files);
                RequestField::Documents
            }
            RequestUpdate::RemoveDocument(index) => {
                if index < self.documents.len() {
                    self.documents.remove(index);
                }
                RequestField::Documents
            }
            RequestUpdate::Agent(v) => {
                self.agent = v;
                RequestField::Agent
            }
        }
    }

    fn update_from_input(field: RequestField, value: InputValue) -> Result<RequestUpdate, FormError> {
        let name = field.name();
        Ok(match field {
            RequestField::PropertyType => RequestUpdate::PropertyType(value.into_text(name)?),
            RequestField::Location => RequestUpdate::Location(value.into_text(name)?),
            RequestField::Description => RequestUpdate::Description(value.into_text(name)?),
            RequestField::Urgency => {
                let raw = value.into_text(name)?;
                let urgency = raw.parse().map_err(|_| FormError::InvalidChoice {
                    field: name.to_string(),
                    value: raw.clone(),
                })?;
                RequestUpdate::Urgency(urgency)
            }
            RequestField::Documents => RequestUpdate::AddDocuments(value.into_files(name)?),
            RequestField::Agent => RequestUpdate::Agent(value.into_text(name)?),
        })
    }

    fn validate(&self, _scope: FullScope, locale: Locale) -> FieldErrors<RequestField> {
        let mut errors = FieldErrors::new();
        errors.check(
            RequestField::PropertyType,
            validate::required(&self.property_type, Message::PropertyTypeRequired),
            locale,
        );
        errors.check(
            RequestField::Location,
            validate::required(&self.location, Message::LocationRequired),
            locale,
        );
        errors.check(
            RequestField::Description,
            validate::required(&self.description, Message::DescriptionRequired),
            locale,
        );
        let documents = if self.documents.iter().any(|d| d.file_name.is_empty()) {
            Some(Message::DocumentUnnamed)
        } else if self.documents.iter().any(|d| !d.is_accepted_type()) {
            Some(Message::DocumentTypeRejected)
        } else {
            None
        };
        errors.check(RequestField::Documents, documents, locale);
        errors
    }
}
