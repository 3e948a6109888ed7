//! Server-owned records as the backend returns them.
//!
//! The client holds read-only copies of these. Unknown keys on users and
//! sessions are kept in `extra` so a persisted session round-trips unchanged.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::i18n::Locale;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Authentication result: identity plus bearer credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub token: String,
    #[serde(rename = "userInfo")]
    pub user_info: UserInfo,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Urgency chosen for a request.
///
/// Any value the client does not know decodes as `Medium`.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for Urgency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("Invalid urgency: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Urgency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| s.parse().ok()).unwrap_or_default())
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing state of a registration request.
///
/// Any status the client does not know is shown as rejected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    #[serde(other)]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Self::Pending, Locale::En) => "Pending",
            (Self::InProgress, Locale::En) => "In progress",
            (Self::Completed, Locale::En) => "Approved",
            (Self::Rejected, Locale::En) => "Rejected",
            (Self::Pending, Locale::Fr) => "En attente",
            (Self::InProgress, Locale::Fr) => "En cours",
            (Self::Completed, Locale::Fr) => "Approuvée",
            (Self::Rejected, Locale::Fr) => "Rejetée",
        }
    }
}

/// The agent on a request: populated user record or bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AgentRef {
    Populated(UserInfo),
    Id(String),
}

impl AgentRef {
    pub fn display_name(&self) -> String {
        match self {
            AgentRef::Populated(user) => user.full_name(),
            AgentRef::Id(id) => id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub request_number: String,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub urgency: Urgency,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentRef>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_deserialize_preserves_extra_keys() {
        let json = r#"{
            "_id": "u1",
            "token": "tok-123",
            "userInfo": {"_id": "u1", "firstName": "Awa", "lastName": "Diop", "email": "awa@example.com", "phone": "+221"},
            "expiresIn": 3600
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.token, "tok-123");
        assert_eq!(session.user_info.full_name(), "Awa Diop");
        assert_eq!(session.user_info.extra["phone"], "+221");
        assert_eq!(session.extra["expiresIn"], 3600);

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["expiresIn"], 3600);
        assert_eq!(back["userInfo"]["firstName"], "Awa");
    }

    #[test]
    fn test_request_deserialize_with_populated_agent() {
        let json = r#"{
            "_id": "r1",
            "requestNumber": "REQ-0001",
            "propertyType": "Terrain",
            "urgency": "high",
            "status": "in_progress",
            "agent": {"_id": "a1", "firstName": "Moussa", "lastName": "Fall", "email": "m@example.com"},
            "createdAt": "2025-03-01T10:00:00Z"
        }"#;
        let request: PropertyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.urgency, Urgency::High);
        assert_eq!(request.status, RequestStatus::InProgress);
        assert_eq!(request.agent.unwrap().display_name(), "Moussa Fall");
    }

    #[test]
    fn test_request_deserialize_with_agent_id() {
        let json = r#"{
            "_id": "r2",
            "propertyType": "Maison",
            "status": "pending",
            "agent": "a42",
            "createdAt": "2025-03-01T10:00:00Z"
        }"#;
        let request: PropertyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.agent, Some(AgentRef::Id("a42".to_string())));
        assert_eq!(request.urgency, Urgency::Medium);
        assert_eq!(request.request_number, "");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let status: RequestStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(status, RequestStatus::Rejected);
        assert_eq!(status.label(Locale::Fr), "Rejetée");
    }

    #[test]
    fn test_unknown_urgency_keeps_whole_list() {
        let json = r#"[
            {"_id": "r1", "propertyType": "Terrain", "urgency": "high", "status": "pending", "createdAt": "2025-03-01T10:00:00Z"},
            {"_id": "r2", "propertyType": "Maison", "urgency": "urgent", "status": "pending", "createdAt": "2025-03-02T10:00:00Z"},
            {"_id": "r3", "propertyType": "Villa", "urgency": null, "status": "completed", "createdAt": "2025-03-03T10:00:00Z"}
        ]"#;
        let requests: Vec<PropertyRequest> = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2", "r3"]);
        assert_eq!(requests[0].urgency, Urgency::High);
        assert_eq!(requests[1].urgency, Urgency::Medium);
        assert_eq!(requests[2].urgency, Urgency::Medium);
    }

    #[test]
    fn test_urgency_from_str() {
        assert_eq!("low".parse::<Urgency>().unwrap(), Urgency::Low);
        assert!("urgent".parse::<Urgency>().is_err());
        assert_eq!(Urgency::High.to_string(), "high");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(RequestStatus::Pending.label(Locale::En), "Pending");
        assert_eq!(RequestStatus::Completed.label(Locale::Fr), "Approuvée");
        assert_eq!(RequestStatus::InProgress.as_str(), "in_progress");
    }
}
