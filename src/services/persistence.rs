//! Durable session storage — the rehydration/persistence collaborator.
//!
//! DESIGN
//! ======
//! The store persists only the `{authenticated, user}` pair, never `pending`
//! or `last_error` (in-flight attempts and failures are not durable). Writes
//! are best-effort: a failed `save` or `clear` never rolls back the in-memory
//! transition, it is logged and the session continues.
//!
//! `JsonFileStorage` writes atomically (temp file + rename) so a crash
//! mid-write cannot leave a half-serialized session behind.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::state::SessionUser;

// =============================================================================
// TYPES
// =============================================================================

/// The durable subset of the session, mirrored to storage on login/logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

impl PersistedSession {
    #[must_use]
    pub fn signed_in(user: SessionUser) -> Self {
        Self { authenticated: true, user: Some(user) }
    }

    /// A record is only worth restoring when it is a consistent
    /// authenticated pair; anything else is equivalent to no prior session.
    #[must_use]
    pub fn restorable(&self) -> bool {
        self.authenticated && self.user.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt session record: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence collaborator for the session store.
///
/// `load` is called once at startup (rehydration); `save` on successful
/// login; `clear` on logout. The storage medium is an implementation detail.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<PersistedSession>, StorageError>;
    async fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// ENV HELPERS
// =============================================================================

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

// =============================================================================
// JSON FILE STORAGE
// =============================================================================

const DEFAULT_SESSION_FILE: &str = "member-portal-session.json";

/// File-backed storage: one JSON document at a configurable path.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path from `SESSION_FILE`, falling back to a file in the working dir.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var("SESSION_FILE").unwrap_or_else(|_| DEFAULT_SESSION_FILE.into());
        Self::new(path)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| std::ffi::OsString::from("session"), std::ffi::OsStr::to_os_string);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let session = serde_json::from_slice::<PersistedSession>(&bytes)?;
        Ok(Some(session))
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(session)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MEMORY STORAGE
// =============================================================================

/// In-process storage for tests and ephemeral runs.
///
/// `set_failing` makes every operation return `Unavailable`, which exercises
/// the best-effort error handling without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: Mutex<Option<PersistedSession>>,
    failing: std::sync::atomic::AtomicBool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn with_session(session: PersistedSession) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Some(session)),
            failing: std::sync::atomic::AtomicBool::new(false),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(StorageError::Unavailable("storage marked failing".into()));
        }
        Ok(())
    }

    /// Current contents, for assertions.
    pub async fn contents(&self) -> Option<PersistedSession> {
        self.inner.lock().await.clone()
    }
}

#[async_trait]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        self.check_available()?;
        Ok(self.inner.lock().await.clone())
    }

    async fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        self.check_available()?;
        *self.inner.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.check_available()?;
        *self.inner.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
