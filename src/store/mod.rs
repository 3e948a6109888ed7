//! Client-side cache of server state.
//!
//! The store is a plain value built once by [`Store::initialize`] and mutated
//! only through [`Store::dispatch`]. Each slice has its own pure reducer:
//!
//! | Slice      | Holds                                  |
//! |------------|----------------------------------------|
//! | `auth`     | current session and login/register flags |
//! | `requests` | the caller's registration requests     |
//! | `agents`   | agents available for assignment        |
//!
//! Async code shares the store through [`StoreHandle`], which serializes
//! dispatches behind a mutex that is never held across an `.await`.

pub mod agents;
pub mod auth;
pub mod requests;

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

pub use agents::{AgentsAction, AgentsState};
pub use auth::{AuthAction, AuthState};
pub use requests::{RequestsAction, RequestsState};

use crate::models::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Requests(RequestsAction),
    Agents(AgentsAction),
}

impl From<AuthAction> for Action {
    fn from(action: AuthAction) -> Self {
        Action::Auth(action)
    }
}

impl From<RequestsAction> for Action {
    fn from(action: RequestsAction) -> Self {
        Action::Requests(action)
    }
}

impl From<AgentsAction> for Action {
    fn from(action: AgentsAction) -> Self {
        Action::Agents(action)
    }
}

/// Names a slice, for the loading start/settle pair shared by every flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slice {
    Auth,
    Requests,
    Agents,
}

impl Slice {
    pub fn started(self) -> Action {
        match self {
            Slice::Auth => AuthAction::Started.into(),
            Slice::Requests => RequestsAction::Started.into(),
            Slice::Agents => AgentsAction::Started.into(),
        }
    }

    pub fn settled(self) -> Action {
        match self {
            Slice::Auth => AuthAction::Settled.into(),
            Slice::Requests => RequestsAction::Settled.into(),
            Slice::Agents => AgentsAction::Settled.into(),
        }
    }

    pub fn is_loading(self, store: &Store) -> bool {
        match self {
            Slice::Auth => store.auth.loading,
            Slice::Requests => store.requests.loading,
            Slice::Agents => store.agents.loading,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub auth: AuthState,
    pub requests: RequestsState,
    pub agents: AgentsState,
}

impl Store {
    /// Build the initial state, hydrating the session from durable storage.
    pub fn initialize(persisted: Option<Session>) -> Self {
        Self {
            auth: AuthState {
                success: persisted.is_some(),
                session: persisted,
                ..AuthState::default()
            },
            ..Self::default()
        }
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) {
        match action.into() {
            Action::Auth(a) => auth::reduce(&mut self.auth, a),
            Action::Requests(a) => requests::reduce(&mut self.requests, a),
            Action::Agents(a) => agents::reduce(&mut self.agents, a),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.auth.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.session.is_some()
    }
}

/// Shared, serialized access to one [`Store`].
#[derive(Debug, Clone, Default)]
pub struct StoreHandle {
    inner: Arc<Mutex<Store>>,
}

impl StoreHandle {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        // Reducers do not panic mid-update, so a poisoned store is still consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        trace!(?action, "dispatch");
        self.lock().dispatch(action);
    }

    pub fn snapshot(&self) -> Store {
        self.lock().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&Store) -> R) -> R {
        f(&self.lock())
    }
}
