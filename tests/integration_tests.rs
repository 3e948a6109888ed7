//! Integration tests for landreg
//!
//! A mock backend is served with axum on 127.0.0.1:0 and driven both through
//! the library (`ApiClient` + `SubmissionController`) and through the CLI
//! binary.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use axum::Router;
use axum::extract::{Json, Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use predicates::prelude::*;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use landreg::api::{ApiClient, LandRegistryService};
use landreg::controller::{RecordingPresenter, SubmissionController, SubmitOutcome};
use landreg::errors::ApiError;
use landreg::form::{
    Attachment, FieldStore, LoginForm, LoginUpdate, RegisterUpdate, RegistrationWizard,
    RequestForm, RequestUpdate,
};
use landreg::i18n::Locale;
use landreg::session::{MemorySessionStorage, SessionStorage};
use landreg::store::{Store, StoreHandle};
use tokio_util::sync::CancellationToken;

const TOKEN: &str = "tok-123";

/// Helper to create a landreg Command
fn landreg() -> Command {
    cargo_bin_cmd!("landreg")
}

// =============================================================================
// Mock backend
// =============================================================================

/// What the mock backend saw.
#[derive(Default)]
struct Captured {
    /// (part name, file name) for every multipart part of the last request
    parts: Mutex<Vec<(String, Option<String>)>>,
    register_body: Mutex<Option<Value>>,
    create_auth: Mutex<Option<String>>,
}

type Shared = Arc<Captured>;

fn session_json() -> Value {
    json!({
        "_id": "u1",
        "token": TOKEN,
        "userInfo": {
            "_id": "u1",
            "firstName": "Awa",
            "lastName": "Diop",
            "email": "awa@example.com",
            "role": "citoyen"
        }
    })
}

fn request_json(id: &str, number: &str) -> Value {
    json!({
        "_id": id,
        "requestNumber": number,
        "propertyType": "Terrain",
        "location": "Dakar",
        "urgency": "high",
        "status": "pending",
        "createdAt": "2025-03-01T10:00:00Z"
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthorized"})),
    )
        .into_response()
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == "awa@example.com" && body["password"] == "secret1" {
        Json(session_json()).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response()
    }
}

async fn register(State(captured): State<Shared>, Json(body): Json<Value>) -> Response {
    let taken = body["email"] == "taken@example.com";
    *captured.register_body.lock().unwrap() = Some(body);
    if taken {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "Email already used"})),
        )
            .into_response();
    }
    (StatusCode::CREATED, Json(session_json())).into_response()
}

async fn my_requests(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }
    Json(json!([
        request_json("r2", "REQ-0002"),
        request_json("r1", "REQ-0001")
    ]))
    .into_response()
}

async fn create_request(
    State(captured): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    *captured.create_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let _ = field.bytes().await.unwrap();
        parts.push((name, file_name));
    }
    *captured.parts.lock().unwrap() = parts;

    (StatusCode::CREATED, Json(request_json("r3", "REQ-0003"))).into_response()
}

async fn agents() -> Response {
    Json(json!([
        {"_id": "a1", "firstName": "Moussa", "lastName": "Fall", "email": "moussa@example.com", "role": "agent_foncier"}
    ]))
    .into_response()
}

async fn broken() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>").into_response()
}

/// Start the mock backend; returns its `/api` base URL.
async fn spawn_backend() -> (String, Shared) {
    let captured = Shared::default();
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/requests/my-requests", get(my_requests))
        .route("/api/requests", post(create_request))
        .route("/api/users/agents-fonciers", get(agents))
        .route("/api/broken", get(broken))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/api", addr), captured)
}

struct Client {
    controller: SubmissionController,
    storage: Arc<MemorySessionStorage>,
    presenter: Arc<RecordingPresenter>,
}

fn client_for(base_url: &str, agents_path: &str) -> Client {
    let storage = Arc::new(MemorySessionStorage::new());
    let presenter = Arc::new(RecordingPresenter::new());
    let api = ApiClient::new(base_url, Duration::from_secs(5), storage.clone())
        .unwrap()
        .with_agents_path(agents_path);
    let controller = SubmissionController::new(
        StoreHandle::new(Store::initialize(None)),
        Arc::new(api),
        storage.clone(),
        presenter.clone(),
        Locale::En,
    );
    Client {
        controller,
        storage,
        presenter,
    }
}

async fn logged_in(base_url: &str) -> Client {
    let client = client_for(base_url, "/users/agents-fonciers");
    let mut form = FieldStore::new(LoginForm::default(), Locale::En);
    form.set(LoginUpdate::Email("awa@example.com".into()));
    form.set(LoginUpdate::Password("secret1".into()));
    let outcome = client
        .controller
        .login(&mut form, &CancellationToken::new())
        .await;
    assert_eq!(outcome, SubmitOutcome::Succeeded);
    client
}

// =============================================================================
// HTTP client + controller against the mock backend
// =============================================================================

mod backend {
    use super::*;

    #[tokio::test]
    async fn test_login_persists_token_used_as_bearer() {
        let (url, _) = spawn_backend().await;
        let client = logged_in(&url).await;

        assert_eq!(client.storage.token().as_deref(), Some(TOKEN));

        let outcome = client
            .controller
            .fetch_requests(&CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Succeeded);
        let numbers: Vec<_> = client
            .controller
            .store()
            .snapshot()
            .requests
            .items
            .iter()
            .map(|r| r.request_number.clone())
            .collect();
        assert_eq!(numbers, vec!["REQ-0002", "REQ-0001"]);
    }

    #[tokio::test]
    async fn test_calls_without_session_are_unauthenticated() {
        let (url, _) = spawn_backend().await;
        let client = client_for(&url, "/users/agents-fonciers");

        let outcome = client
            .controller
            .fetch_requests(&CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Failed("Unauthorized".into()));
    }

    #[tokio::test]
    async fn test_wrong_credentials_surface_server_message() {
        let (url, _) = spawn_backend().await;
        let client = client_for(&url, "/users/agents-fonciers");
        let mut form = FieldStore::new(LoginForm::default(), Locale::En);
        form.set(LoginUpdate::Email("awa@example.com".into()));
        form.set(LoginUpdate::Password("wrong-pass".into()));

        let outcome = client
            .controller
            .login(&mut form, &CancellationToken::new())
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed("Invalid credentials".into()));
        assert!(client.storage.raw().is_none());
        let store = client.controller.store().snapshot();
        assert_eq!(store.auth.error.as_deref(), Some("Invalid credentials"));
        assert!(!store.auth.loading);
        assert_eq!(client.presenter.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_create_request_sends_multipart_parts() {
        let (url, captured) = spawn_backend().await;
        let client = logged_in(&url).await;

        let mut form = FieldStore::new(RequestForm::default(), Locale::En);
        form.set(RequestUpdate::PropertyType("Terrain".into()));
        form.set(RequestUpdate::Location("Dakar".into()));
        form.set(RequestUpdate::Description("Lot 12".into()));
        form.set(RequestUpdate::AddDocuments(vec![
            Attachment::new("acte.pdf", b"%PDF-1.4".to_vec()),
            Attachment::new("plan.png", vec![0x89, 0x50]),
        ]));

        let outcome = client
            .controller
            .create_request(&mut form, &CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Succeeded);

        let parts = captured.parts.lock().unwrap().clone();
        let names: Vec<_> = parts.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "propertyType",
                "location",
                "description",
                "urgency",
                "documents",
                "documents"
            ]
        );
        let files: Vec<_> = parts.iter().filter_map(|(_, f)| f.clone()).collect();
        assert_eq!(files, vec!["acte.pdf", "plan.png"]);
        assert_eq!(
            captured.create_auth.lock().unwrap().as_deref(),
            Some("Bearer tok-123")
        );

        // Refetched after the create.
        let store = client.controller.store().snapshot();
        assert_eq!(store.requests.items.len(), 2);
        assert_eq!(form.values(), &RequestForm::default());
    }

    #[tokio::test]
    async fn test_selected_agent_is_sent() {
        let (url, captured) = spawn_backend().await;
        let client = logged_in(&url).await;

        let mut form = FieldStore::new(RequestForm::default(), Locale::En);
        form.set(RequestUpdate::PropertyType("Maison".into()));
        form.set(RequestUpdate::Location("Thiès".into()));
        form.set(RequestUpdate::Description("Villa".into()));
        form.set(RequestUpdate::Agent("a1".into()));

        client
            .controller
            .create_request(&mut form, &CancellationToken::new())
            .await;
        let parts = captured.parts.lock().unwrap().clone();
        assert!(parts.iter().any(|(n, _)| n == "agent"));
        assert!(!parts.iter().any(|(n, _)| n == "documents"));
    }

    #[tokio::test]
    async fn test_register_wire_format() {
        let (url, captured) = spawn_backend().await;
        let client = client_for(&url, "/users/agents-fonciers");

        let mut wizard = RegistrationWizard::new(Locale::En);
        let store = wizard.store_mut();
        store.set(RegisterUpdate::FirstName("Awa".into()));
        store.set(RegisterUpdate::LastName("Diop".into()));
        store.set(RegisterUpdate::Email("awa@example.com".into()));
        store.set(RegisterUpdate::PhoneNumber("+221770000000".into()));
        wizard.advance();
        let store = wizard.store_mut();
        store.set(RegisterUpdate::Password("P4$sword".into()));
        store.set(RegisterUpdate::ConfirmPassword("P4$sword".into()));
        store.set(RegisterUpdate::AcceptTerms(true));

        let outcome = client
            .controller
            .register(&mut wizard, &CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Succeeded);

        let body = captured.register_body.lock().unwrap().clone().unwrap();
        assert_eq!(body["phoneNumber"], "+221770000000");
        assert_eq!(body["role"], "citoyen");
        assert_eq!(body["accountType"], "individual");
        assert_eq!(body["acceptTerms"], true);
        assert!(body.get("organization").is_none());

        // Registration does not persist the session.
        assert!(client.storage.raw().is_none());
    }

    #[tokio::test]
    async fn test_register_conflict_message() {
        let (url, _) = spawn_backend().await;
        let client = client_for(&url, "/users/agents-fonciers");

        let mut wizard = RegistrationWizard::new(Locale::Fr);
        let store = wizard.store_mut();
        store.set(RegisterUpdate::FirstName("Awa".into()));
        store.set(RegisterUpdate::LastName("Diop".into()));
        store.set(RegisterUpdate::Email("taken@example.com".into()));
        store.set(RegisterUpdate::PhoneNumber("+221770000000".into()));
        wizard.advance();
        let store = wizard.store_mut();
        store.set(RegisterUpdate::Password("P4$sword".into()));
        store.set(RegisterUpdate::ConfirmPassword("P4$sword".into()));
        store.set(RegisterUpdate::AcceptTerms(true));

        let outcome = client
            .controller
            .register(&mut wizard, &CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Failed("Email already used".into()));
    }

    #[tokio::test]
    async fn test_agents_listing() {
        let (url, _) = spawn_backend().await;
        let client = client_for(&url, "/users/agents-fonciers");
        let outcome = client
            .controller
            .fetch_agents(&CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Succeeded);
        let agents = client.controller.store().snapshot().agents.agents;
        assert_eq!(agents[0].full_name(), "Moussa Fall");
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_server_fallback() {
        let (url, _) = spawn_backend().await;
        let client = client_for(&url, "/broken");
        let outcome = client
            .controller
            .fetch_agents(&CancellationToken::new())
            .await;
        assert_eq!(outcome, SubmitOutcome::Failed("Server error".into()));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let storage = Arc::new(MemorySessionStorage::new());
        let api = ApiClient::new(
            &format!("http://{}/api", addr),
            Duration::from_secs(2),
            storage,
        )
        .unwrap();
        let err = api.my_requests().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
        assert_eq!(err.user_message(Locale::Fr), "Erreur inconnue");
    }
}

// =============================================================================
// CLI
// =============================================================================

/// Temp dirs for the config file and the session storage.
struct CliEnv {
    dir: TempDir,
}

impl CliEnv {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> std::path::PathBuf {
        self.dir.path().join("landreg.toml")
    }

    fn storage_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("data")
    }

    fn cmd(&self) -> Command {
        let mut cmd = landreg();
        cmd.arg("--config")
            .arg(self.config_path())
            .env("LANDREG_STORAGE_DIR", self.storage_dir())
            .env_remove("LANDREG_API_URL")
            .env_remove("LANDREG_LOCALE")
            .env_remove("RUST_LOG");
        cmd
    }
}

mod cli_basics {
    use super::*;

    #[test]
    fn test_landreg_help() {
        landreg()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("requests"));
    }

    #[test]
    fn test_landreg_version() {
        landreg().arg("--version").assert().success();
    }

    #[test]
    fn test_requests_new_help_lists_document_flag() {
        landreg()
            .args(["requests", "new", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--document"));
    }

    #[test]
    fn test_invalid_urgency_is_rejected() {
        let env = CliEnv::new();
        env.cmd()
            .args(["requests", "new", "--urgency", "urgent"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("urgent"));
    }

    #[test]
    fn test_whoami_when_signed_out() {
        let env = CliEnv::new();
        env.cmd()
            .arg("whoami")
            .assert()
            .success()
            .stdout(predicate::str::contains("Not signed in"));
    }

    #[test]
    fn test_logout_when_signed_out_succeeds() {
        let env = CliEnv::new();
        env.cmd().arg("logout").assert().success();
    }
}

mod cli_config {
    use super::*;

    #[test]
    fn test_config_show_defaults() {
        let env = CliEnv::new();
        env.cmd()
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No landreg.toml found"))
            .stdout(predicate::str::contains(
                "land-management-backend-app.onrender.com",
            ));
    }

    #[test]
    fn test_config_init_then_validate() {
        let env = CliEnv::new();
        env.cmd()
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Created landreg.toml"));
        assert!(env.config_path().exists());

        env.cmd()
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already exists"));

        env.cmd()
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration is valid."));
    }

    #[test]
    fn test_config_validate_reports_warnings() {
        let env = CliEnv::new();
        std::fs::write(
            env.config_path(),
            "[api]\nbase_url = \"localhost:5000\"\ntimeout_secs = 0\n",
        )
        .unwrap();
        env.cmd()
            .args(["config", "validate"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration warnings:"))
            .stdout(predicate::str::contains("timeout_secs"));
    }

    #[test]
    fn test_env_locale_override_is_shown() {
        let env = CliEnv::new();
        env.cmd()
            .env("LANDREG_LOCALE", "fr")
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("locale = \"fr\""));
    }

    #[test]
    fn test_malformed_config_fails() {
        let env = CliEnv::new();
        std::fs::write(env.config_path(), "[api\n").unwrap();
        env.cmd()
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("landreg.toml"));
    }
}

mod cli_session {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_login_whoami_logout() {
        let (url, _) = spawn_backend().await;
        let env = CliEnv::new();
        let session_file = env.storage_dir().join("authUser.json");

        let mut login = env.cmd();
        login.args([
            "--api-url",
            url.as_str(),
            "login",
            "--email",
            "awa@example.com",
            "--password",
            "secret1",
        ]);
        tokio::task::spawn_blocking(move || {
            login
                .assert()
                .success()
                .stdout(predicate::str::contains("Signed in successfully!"));
        })
        .await
        .unwrap();
        assert!(session_file.exists());

        env.cmd()
            .arg("whoami")
            .assert()
            .success()
            .stdout(predicate::str::contains("Awa Diop"))
            .stdout(predicate::str::contains("awa@example.com"));

        env.cmd().arg("logout").assert().success();
        assert!(!session_file.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_login_failure_exits_nonzero() {
        let (url, _) = spawn_backend().await;
        let env = CliEnv::new();

        let mut login = env.cmd();
        login.args([
            "--api-url",
            url.as_str(),
            "login",
            "--email",
            "awa@example.com",
            "--password",
            "nope-nope",
        ]);
        tokio::task::spawn_blocking(move || {
            login
                .assert()
                .failure()
                .stderr(predicate::str::contains("Invalid credentials"));
        })
        .await
        .unwrap();
        assert!(!env.storage_dir().join("authUser.json").exists());
    }

    #[test]
    fn test_login_with_invalid_email_shows_field_error() {
        let env = CliEnv::new();
        env.cmd()
            .args(["login", "--email", "not-an-email", "--password", "secret1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("email"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_requests_list_after_login() {
        let (url, _) = spawn_backend().await;
        let env = CliEnv::new();

        let mut login = env.cmd();
        login.args([
            "--api-url",
            url.as_str(),
            "login",
            "--email",
            "awa@example.com",
            "--password",
            "secret1",
        ]);
        tokio::task::spawn_blocking(move || {
            login.assert().success();
        })
        .await
        .unwrap();

        let mut list = env.cmd();
        list.args(["--api-url", url.as_str(), "requests", "list"]);
        tokio::task::spawn_blocking(move || {
            list.assert()
                .success()
                .stdout(predicate::str::contains("REQ-0002"))
                .stdout(predicate::str::contains("Pending"));
        })
        .await
        .unwrap();
    }
}
