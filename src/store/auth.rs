use crate::models::Session;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: bool,
    pub session: Option<Session>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// A login or registration call is about to start.
    Started,
    /// The call resolved, whatever the outcome.
    Settled,
    RegisterSucceeded(Session),
    RegisterFailed(String),
    LoginSucceeded(Session),
    LoginFailed(String),
    LoggedOut,
}

pub fn reduce(state: &mut AuthState, action: AuthAction) {
    match action {
        AuthAction::Started => {
            state.loading = true;
            state.error = None;
            state.success = false;
        }
        AuthAction::Settled => state.loading = false,
        AuthAction::RegisterSucceeded(session) | AuthAction::LoginSucceeded(session) => {
            state.loading = false;
            state.success = true;
            state.session = Some(session);
        }
        AuthAction::RegisterFailed(message) | AuthAction::LoginFailed(message) => {
            state.loading = false;
            state.error = Some(message);
        }
        AuthAction::LoggedOut => {
            state.session = None;
            state.success = false;
        }
    }
}
