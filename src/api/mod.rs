//! HTTP client for the land-registration REST backend.
//!
//! Every call resolves to `Result<T, ApiError>`. The bearer token is read from
//! durable session storage at call time, so a login in another process is
//! picked up without restarting.

pub mod multipart;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::ApiError;
use crate::form::RequestForm;
use crate::form::login::LoginPayload;
use crate::form::register::RegisterPayload;
use crate::models::{PropertyRequest, Session, UserInfo};
use crate::session::SessionStorage;

pub use multipart::{MultipartPayload, Part};

pub const DEFAULT_BASE_URL: &str = "https://land-management-backend-app.onrender.com/api";
pub const DEFAULT_AGENTS_PATH: &str = "/users/agents-fonciers";

/// Operations the submission controller needs from the backend.
#[async_trait]
pub trait LandRegistryService: Send + Sync {
    async fn register(&self, payload: &RegisterPayload) -> Result<Session, ApiError>;
    async fn login(&self, payload: &LoginPayload) -> Result<Session, ApiError>;
    async fn my_requests(&self) -> Result<Vec<PropertyRequest>, ApiError>;
    async fn create_request(&self, form: &RequestForm) -> Result<PropertyRequest, ApiError>;
    async fn list_agents(&self) -> Result<Vec<UserInfo>, ApiError>;
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    agents_path: String,
    session: Arc<dyn SessionStorage>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<dyn SessionStorage>,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("landreg/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            agents_path: DEFAULT_AGENTS_PATH.to_string(),
            session,
        })
    }

    pub fn with_agents_path(mut self, path: &str) -> Self {
        self.agents_path = path.to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer <token>` when a session is stored.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await?;
        decode(response).await
    }
}

#[async_trait]
impl LandRegistryService for ApiClient {
    async fn register(&self, payload: &RegisterPayload) -> Result<Session, ApiError> {
        debug!(email = %payload.email, "POST /auth/register");
        self.send(self.http.post(self.url("/auth/register")).json(payload))
            .await
    }

    async fn login(&self, payload: &LoginPayload) -> Result<Session, ApiError> {
        debug!(email = %payload.email, "POST /auth/login");
        self.send(self.http.post(self.url("/auth/login")).json(payload))
            .await
    }

    async fn my_requests(&self) -> Result<Vec<PropertyRequest>, ApiError> {
        debug!("GET /requests/my-requests");
        self.send(self.http.get(self.url("/requests/my-requests")))
            .await
    }

    async fn create_request(&self, form: &RequestForm) -> Result<PropertyRequest, ApiError> {
        let payload = MultipartPayload::from_request(form);
        debug!(
            documents = payload.count("documents"),
            "POST /requests (multipart)"
        );
        let body = payload
            .into_form()
            .map_err(|e| ApiError::Unknown(format!("Invalid document: {}", e)))?;
        self.send(self.http.post(self.url("/requests")).multipart(body))
            .await
    }

    async fn list_agents(&self) -> Result<Vec<UserInfo>, ApiError> {
        debug!(path = %self.agents_path, "GET agents");
        self.send(self.http.get(self.url(&self.agents_path))).await
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Map a non-2xx status and its body to `ApiError::Server`.
pub(crate) fn server_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message);
    ApiError::Server { status, message }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "request failed");
        return Err(server_error(status.as_u16(), &body));
    }
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::Unknown(format!("Failed to decode response: {}", e)))
}
