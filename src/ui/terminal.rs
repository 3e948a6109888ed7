//! Terminal rendering of notifications, navigation and field errors.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::controller::{Notification, NotificationKind, Presenter, Route};
use crate::form::{FieldErrors, FieldName};
use crate::ui::icons::{CHECK, CROSS, HOUSE, KEY, WARN};

/// Presenter for the CLI: notifications become styled lines and navigation
/// becomes a hint about the command to run next.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => {
                println!("{}{}", CHECK, style(notification.text).green().bold())
            }
            NotificationKind::Error => {
                eprintln!("{}{}", CROSS, style(notification.text).red().bold())
            }
        }
    }

    fn navigate(&self, route: Route) {
        match route {
            Route::Dashboard => println!(
                "{}Next: {}",
                HOUSE,
                style("landreg requests list").cyan()
            ),
            Route::Login => println!("{}Next: {}", KEY, style("landreg login").cyan()),
            Route::CloseModal => {}
        }
    }
}

/// Spinner shown while a call is in flight. Finish it with
/// `finish_and_clear` once the call resolves.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("spinner template is a valid static string"),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Print each field error next to its field name.
pub fn print_field_errors<K: FieldName>(errors: &FieldErrors<K>) {
    for (field, message) in errors.iter() {
        eprintln!(
            "  {}{} {}",
            WARN,
            style(field.name()).yellow().bold(),
            message
        );
    }
}
