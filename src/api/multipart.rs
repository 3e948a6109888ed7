//! Multipart body of `POST /requests`.
//!
//! The payload is built as plain data first so its shape can be checked
//! without a server, then converted into a `reqwest` form at send time.

use crate::form::RequestForm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl Part {
    pub fn name(&self) -> &'static str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    pub parts: Vec<Part>,
}

impl MultipartPayload {
    /// One text part per scalar field, the agent only when one is selected,
    /// and one `documents` part per attached file.
    pub fn from_request(form: &RequestForm) -> Self {
        let mut parts = vec![
            text("propertyType", &form.property_type),
            text("location", &form.location),
            text("description", &form.description),
            text("urgency", form.urgency.as_str()),
        ];
        if !form.agent.is_empty() {
            parts.push(text("agent", &form.agent));
        }
        parts.extend(form.documents.iter().map(|doc| Part::File {
            name: "documents",
            file_name: doc.file_name.clone(),
            content_type: doc.content_type.clone(),
            bytes: doc.bytes.clone(),
        }));
        Self { parts }
    }

    pub fn count(&self, name: &str) -> usize {
        self.parts.iter().filter(|p| p.name() == name).count()
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            Part::Text { name: n, value } if *n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn into_form(self) -> Result<reqwest::multipart::Form, reqwest::Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                Part::Text { name, value } => form.text(name, value),
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    let file = reqwest::multipart::Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&content_type)?;
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

fn text(name: &'static str, value: &str) -> Part {
    Part::Text {
        name,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::Attachment;
    use crate::models::Urgency;

    fn form() -> RequestForm {
        RequestForm {
            property_type: "Terrain".into(),
            location: "Dakar".into(),
            description: "Lot 12".into(),
            urgency: Urgency::High,
            documents: vec![
                Attachment::new("acte.pdf", b"%PDF".to_vec()),
                Attachment::new("plan.jpg", vec![0xff, 0xd8]),
            ],
            agent: String::new(),
        }
    }

    #[test]
    fn test_two_documents_make_two_parts() {
        let payload = MultipartPayload::from_request(&form());
        assert_eq!(payload.count("documents"), 2);
        for scalar in ["propertyType", "location", "description", "urgency"] {
            assert_eq!(payload.count(scalar), 1, "{}", scalar);
        }
        assert_eq!(payload.count("agent"), 0);
        assert_eq!(payload.parts.len(), 6);
    }

    #[test]
    fn test_selected_agent_is_sent() {
        let mut form = form();
        form.agent = "a42".into();
        let payload = MultipartPayload::from_request(&form);
        assert_eq!(payload.text_value("agent"), Some("a42"));
    }

    #[test]
    fn test_scalar_values() {
        let payload = MultipartPayload::from_request(&form());
        assert_eq!(payload.text_value("urgency"), Some("high"));
        assert_eq!(payload.text_value("propertyType"), Some("Terrain"));
    }

    #[test]
    fn test_document_parts_keep_name_and_type() {
        let payload = MultipartPayload::from_request(&form());
        let files: Vec<_> = payload
            .parts
            .iter()
            .filter_map(|p| match p {
                Part::File {
                    file_name,
                    content_type,
                    ..
                } => Some((file_name.as_str(), content_type.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            files,
            vec![("acte.pdf", "application/pdf"), ("plan.jpg", "image/jpeg")]
        );
    }

    #[test]
    fn test_converts_to_reqwest_form() {
        let form = MultipartPayload::from_request(&form()).into_form().unwrap();
        assert!(!form.boundary().is_empty());
    }
}
