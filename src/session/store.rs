//! Durable session persistence.
//!
//! One JSON document of flat string entries under the app data dir.
//! No schema versioning: unknown entries are ignored on read, and a
//! document missing a required entry (or whose role no longer parses)
//! is treated as absent, and the user simply logs in again.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Session, User};

const SESSION_FILE: &str = "session.json";

/// On-disk shape. Everything is a string so the document stays
/// readable and future entries can be added without migration.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user_id: String,
    email: String,
    full_name: String,
    role: String,
}

impl SessionRecord {
    fn from_session(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            refresh_token: session.refresh_token.clone(),
            user_id: session.user.id.to_string(),
            email: session.user.email.clone(),
            full_name: session.user.full_name.clone(),
            role: session.user.role.as_str().to_string(),
        }
    }

    fn into_session(self) -> Option<Session> {
        let id = Uuid::parse_str(&self.user_id).ok()?;
        let role = self.role.parse().ok()?;
        Some(Session {
            token: self.token,
            refresh_token: self.refresh_token,
            user: User {
                id,
                email: self.email,
                full_name: self.full_name,
                role,
            },
        })
    }
}

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reads and writes the persisted session document.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    /// Persist the session, replacing any previous document.
    pub fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let record = SessionRecord::from_session(session);
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Load the persisted session, if a usable one exists.
    ///
    /// Any failure (missing file, malformed JSON, unparseable role or
    /// user id) reads as `None`. A corrupt document is not an error
    /// state worth surfacing; the next login overwrites it.
    pub fn load(&self) -> Option<Session> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let record: SessionRecord = match serde_json::from_str(&contents) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!("Ignoring unreadable session document: {e}");
                return None;
            }
        };
        record.into_session()
    }

    /// Delete the persisted document. Missing file is not an error.
    pub fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
