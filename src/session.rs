//! Durable storage of the authenticated session.
//!
//! One key, `authUser`, holds the JSON-serialized session. It is read once at
//! startup to hydrate the store, read again by the HTTP client to find the
//! bearer token, written on login and removed on logout.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::errors::StorageError;
use crate::models::Session;

/// Fixed storage key of the session.
pub const SESSION_KEY: &str = "authUser";

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StorageError>;

    /// Replace the stored session as a whole.
    fn save(&self, session: &Session) -> Result<(), StorageError>;

    /// Remove the key. Clearing an absent key is not an error.
    fn clear(&self) -> Result<(), StorageError>;

    /// Bearer token of the stored session, if any.
    ///
    /// An unreadable or corrupt session counts as no session.
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(session) => session.map(|s| s.token).filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session");
                None
            }
        }
    }
}

/// Session kept as `<dir>/authUser.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.json", SESSION_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(session).map_err(StorageError::Serialize)?;
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        // Whole-file replacement: write a sibling, then rename over the key.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(write_err)?;
        if let Err(source) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// In-process storage holding the serialized JSON, for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let storage = Self::new();
        // A Session always serializes.
        let _ = storage.save(session);
        storage
    }

    /// The stored JSON text, exactly as written.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        match self.raw() {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    path: PathBuf::from(SESSION_KEY),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), StorageError> {
        let json = serde_json::to_string(session).map_err(StorageError::Serialize)?;
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(json);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
        Ok(())
    }
}
