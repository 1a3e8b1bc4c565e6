use std::fs;
use std::path::{Path, PathBuf};

use crate::model::session::Session;

/// Error type for session persistence
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not logged in (run `tb login <username>`)")]
    NotLoggedIn,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Persisted token pair (session.json).
///
/// The file holds the two keys `accessToken` and `refreshToken`; logout
/// removes the file, clearing both.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Store in the default config directory
    pub fn default_location() -> Self {
        SessionStore::new(super::config_dir().join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path).map_err(|e| SessionError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let session: Session =
            serde_json::from_str(&text).map_err(|e| SessionError::Corrupt {
                path: self.path.clone(),
                source: e,
            })?;
        if session.access.is_empty() {
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Load the stored session or fail with [`SessionError::NotLoggedIn`].
    /// This is the guard every protected command goes through.
    pub fn require(&self) -> Result<Session, SessionError> {
        self.load()?.ok_or(SessionError::NotLoggedIn)
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(session).map_err(|e| SessionError::Corrupt {
            path: self.path.clone(),
            source: e,
        })?;
        super::atomic_write(&self.path, content.as_bytes()).map_err(|e| {
            SessionError::WriteError {
                path: self.path.clone(),
                source: e,
            }
        })?;
        tracing::debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Remove both tokens. Returns false if there was nothing to clear.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(SessionError::WriteError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}
