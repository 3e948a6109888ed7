//! What the controller asks of the view layer.

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// A transient message for the user (toast in a GUI, a line in the CLI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    /// Dismiss the view hosting the current form.
    CloseModal,
}

pub trait Presenter: Send + Sync {
    fn notify(&self, notification: Notification);
    fn navigate(&self, route: Route);
}

/// Presenter that only remembers what it was asked to do.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    notifications: Mutex<Vec<Notification>>,
    routes: Mutex<Vec<Route>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Presenter for RecordingPresenter {
    fn notify(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }

    fn navigate(&self, route: Route) {
        if let Ok(mut r) = self.routes.lock() {
            r.push(route);
        }
    }
}
