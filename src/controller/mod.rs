//! Submission flows: validate, call the backend, update the store, notify.
//!
//! Each flow follows the same sequence:
//!
//! 1. validate the form scope; stop with [`SubmitOutcome::Invalid`] on errors
//! 2. dispatch the slice's `Started` action and arm a [`LoadingGuard`]
//! 3. await the service call, racing the caller's cancellation token
//! 4. dispatch success or failure, notify, navigate
//!
//! The guard dispatches `Settled` when it drops, so the loading flag is
//! cleared on every exit path, cancellation included.

pub mod presenter;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::LandRegistryService;
use crate::errors::{ApiError, StorageError};
use crate::form::{FieldStore, FullScope, LoginForm, RegistrationWizard, RequestForm};
use crate::i18n::{Locale, Message};
use crate::session::SessionStorage;
use crate::store::{Action, AgentsAction, AuthAction, RequestsAction, Slice, StoreHandle};

pub use presenter::{Notification, NotificationKind, Presenter, RecordingPresenter, Route};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Client-side validation failed; nothing was sent.
    Invalid,
    Succeeded,
    /// The call failed with this user-facing message.
    Failed(String),
    /// The caller's token fired before the call resolved.
    Cancelled,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Succeeded)
    }
}

/// Dispatches the slice's `Settled` action when dropped.
pub struct LoadingGuard {
    store: StoreHandle,
    slice: Slice,
}

impl LoadingGuard {
    /// Dispatch `Started` for `slice` and arm the guard.
    pub fn start(store: &StoreHandle, slice: Slice) -> Self {
        store.dispatch(slice.started());
        Self {
            store: store.clone(),
            slice,
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.dispatch(self.slice.settled());
    }
}

#[derive(Clone)]
pub struct SubmissionController {
    store: StoreHandle,
    service: Arc<dyn LandRegistryService>,
    storage: Arc<dyn SessionStorage>,
    presenter: Arc<dyn Presenter>,
    locale: Locale,
}

impl SubmissionController {
    pub fn new(
        store: StoreHandle,
        service: Arc<dyn LandRegistryService>,
        storage: Arc<dyn SessionStorage>,
        presenter: Arc<dyn Presenter>,
        locale: Locale,
    ) -> Self {
        Self {
            store,
            service,
            storage,
            presenter,
            locale,
        }
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub async fn login(
        &self,
        form: &mut FieldStore<LoginForm>,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        if !form.validate(FullScope) {
            return self.blocked("login", form.errors().len());
        }
        let payload = form.values().payload();
        let _guard = LoadingGuard::start(&self.store, Slice::Auth);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            result = self.service.login(&payload) => result,
        };

        match result {
            Ok(session) => {
                info!(user = %session.user_info.email, "logged in");
                if let Err(e) = self.storage.save(&session) {
                    warn!(error = %e, "failed to persist session");
                }
                self.store.dispatch(AuthAction::LoginSucceeded(session));
                self.succeed(Message::LoginSucceeded);
                self.presenter.navigate(Route::Dashboard);
                SubmitOutcome::Succeeded
            }
            Err(e) => self.fail("login", e, AuthAction::LoginFailed),
        }
    }

    /// Submit the wizard. Only runs from the credentials step.
    pub async fn register(
        &self,
        wizard: &mut RegistrationWizard,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        if !wizard.ready_to_submit() {
            return self.blocked("register", wizard.store().errors().len());
        }
        let payload = wizard.store().values().payload();
        let _guard = LoadingGuard::start(&self.store, Slice::Auth);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            result = self.service.register(&payload) => result,
        };

        match result {
            Ok(session) => {
                info!(user = %session.user_info.email, "registered");
                // Kept in memory only; the user still has to log in.
                self.store.dispatch(AuthAction::RegisterSucceeded(session));
                self.succeed(Message::RegisterSucceeded);
                wizard.reset();
                self.presenter.navigate(Route::Login);
                SubmitOutcome::Succeeded
            }
            Err(e) => self.fail("register", e, AuthAction::RegisterFailed),
        }
    }

    pub async fn create_request(
        &self,
        form: &mut FieldStore<RequestForm>,
        cancel: &CancellationToken,
    ) -> SubmitOutcome {
        if !form.validate(FullScope) {
            return self.blocked("create_request", form.errors().len());
        }
        let snapshot = form.snapshot();
        let guard = LoadingGuard::start(&self.store, Slice::Requests);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            result = self.service.create_request(&snapshot) => result,
        };

        match result {
            Ok(request) => {
                info!(id = %request.id, number = %request.request_number, "request submitted");
                self.store.dispatch(RequestsAction::AddSucceeded(request));
                self.succeed(Message::RequestSubmitted);
                form.reset();
                self.presenter.navigate(Route::CloseModal);
                drop(guard);
                self.fetch_requests(cancel).await;
                SubmitOutcome::Succeeded
            }
            Err(e) => self.fail("create_request", e, RequestsAction::AddFailed),
        }
    }

    /// Refresh the caller's requests. Failures are recorded, not notified.
    pub async fn fetch_requests(&self, cancel: &CancellationToken) -> SubmitOutcome {
        let _guard = LoadingGuard::start(&self.store, Slice::Requests);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            result = self.service.my_requests() => result,
        };
        match result {
            Ok(items) => {
                self.store.dispatch(RequestsAction::FetchSucceeded(items));
                SubmitOutcome::Succeeded
            }
            Err(e) => self.record_failure("fetch_requests", e, RequestsAction::FetchFailed),
        }
    }

    pub async fn fetch_agents(&self, cancel: &CancellationToken) -> SubmitOutcome {
        let _guard = LoadingGuard::start(&self.store, Slice::Agents);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SubmitOutcome::Cancelled,
            result = self.service.list_agents() => result,
        };
        match result {
            Ok(agents) => {
                self.store.dispatch(AgentsAction::FetchSucceeded(agents));
                SubmitOutcome::Succeeded
            }
            Err(e) => self.record_failure("fetch_agents", e, AgentsAction::FetchFailed),
        }
    }

    /// Forget the session in durable storage, then in memory.
    ///
    /// When the stored session cannot be removed the in-memory session is
    /// kept and nothing is announced.
    pub fn logout(&self) -> Result<(), StorageError> {
        if let Err(e) = self.storage.clear() {
            error!(error = %e, "logout could not remove the stored session");
            return Err(e);
        }
        self.store.dispatch(AuthAction::LoggedOut);
        info!("logged out");
        self.succeed(Message::LoggedOut);
        self.presenter.navigate(Route::Login);
        Ok(())
    }

    fn succeed(&self, message: Message) {
        self.presenter
            .notify(Notification::success(message.text(self.locale)));
    }

    fn blocked(&self, flow: &str, fields: usize) -> SubmitOutcome {
        let err = ApiError::Validation { fields };
        debug!(flow, error = %err, "submission blocked");
        SubmitOutcome::Invalid
    }

    fn fail<A: Into<Action>>(
        &self,
        flow: &str,
        err: ApiError,
        action: impl FnOnce(String) -> A,
    ) -> SubmitOutcome {
        let outcome = self.record_failure(flow, err, action);
        if let SubmitOutcome::Failed(message) = &outcome {
            self.presenter.notify(Notification::error(message.clone()));
        }
        outcome
    }

    fn record_failure<A: Into<Action>>(
        &self,
        flow: &str,
        err: ApiError,
        action: impl FnOnce(String) -> A,
    ) -> SubmitOutcome {
        let message = err.user_message(self.locale);
        error!(flow, error = %err, "submission failed");
        if err.is_unauthorized() {
            warn!(flow, "backend rejected the session, sign in again");
        }
        self.store.dispatch(action(message.clone()));
        SubmitOutcome::Failed(message)
    }
}
