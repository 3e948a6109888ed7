//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module     | Commands handled                          |
//! |------------|-------------------------------------------|
//! | `auth`     | `Login`, `Register`, `Logout`, `Whoami`   |
//! | `requests` | `Requests`                                |
//! | `agents`   | `Agents`                                  |
//! | `config`   | `Config`                                  |

pub mod agents;
pub mod auth;
pub mod config;
pub mod requests;

pub use agents::cmd_agents;
pub use auth::{cmd_login, cmd_logout, cmd_register, cmd_whoami};
pub use config::cmd_config;
pub use requests::cmd_requests;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use landreg::api::ApiClient;
use landreg::config::LandregConfig;
use landreg::controller::{SubmissionController, SubmitOutcome};
use landreg::session::{FileSessionStorage, SessionStorage};
use landreg::store::{Store, StoreHandle};
use landreg::ui::TerminalPresenter;

/// Everything a command needs to talk to the backend.
pub struct AppContext {
    pub storage: Arc<FileSessionStorage>,
    pub controller: SubmissionController,
}

impl AppContext {
    pub fn new(config: &LandregConfig) -> Result<Self> {
        let storage = Arc::new(FileSessionStorage::new(&config.storage_dir));
        let persisted = storage.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable session");
            None
        });
        let store = StoreHandle::new(Store::initialize(persisted));
        let client = ApiClient::new(&config.base_url, config.timeout, storage.clone())?
            .with_agents_path(&config.agents_path);
        let controller = SubmissionController::new(
            store,
            Arc::new(client),
            storage.clone(),
            Arc::new(TerminalPresenter::new()),
            config.locale,
        );
        Ok(Self {
            storage,
            controller,
        })
    }
}

/// Token cancelled on Ctrl-C, so an in-flight call is abandoned cleanly.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            child.cancel();
        }
    });
    token
}

/// Map a submission outcome to the command's exit status. The presenter has
/// already shown the details.
pub fn finish(outcome: SubmitOutcome, what: &str) -> Result<()> {
    match outcome {
        SubmitOutcome::Succeeded => Ok(()),
        SubmitOutcome::Invalid => anyhow::bail!("{} rejected: fix the fields above", what),
        SubmitOutcome::Failed(_) => anyhow::bail!("{} failed", what),
        SubmitOutcome::Cancelled => anyhow::bail!("{} cancelled", what),
    }
}
