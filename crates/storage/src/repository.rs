use async_trait::async_trait;
use course_core::model::{ProgressKey, ProgressRecord, SessionContext};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Key under which the signed-in user document is kept.
pub const SESSION_KEY: &str = "user";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(format!("{key}: {err}")))
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Local, authoritative store for course progress.
///
/// Records are kept as JSON under [`ProgressKey`]. A stored value that does
/// not parse is reported as `StorageError::Serialization`.
#[async_trait]
pub trait LocalProgressRepository: Send + Sync {
    /// Fetch the progress record for a learner/course pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or the stored JSON is malformed.
    async fn load_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError>;

    /// Replace the progress record for a learner/course pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be written.
    async fn save_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), StorageError>;
}

/// Store for the signed-in learner's identity.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the store is unreachable or the session is malformed.
    async fn current_session(&self) -> Result<Option<SessionContext>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    async fn save_session(&self, session: &SessionContext) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be removed.
    async fn clear_session(&self) -> Result<(), StorageError>;
}

/// Simple in-memory key/value store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) -> Result<(), StorageError> {
        self.lock()?.insert(key.into(), value.into());
        Ok(())
    }

    /// Read a raw value as stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StorageError> {
        self.entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl LocalProgressRepository for InMemoryRepository {
    async fn load_progress(&self, key: &ProgressKey) -> Result<Option<ProgressRecord>, StorageError> {
        let key = key.to_string();
        let raw = self.lock()?.get(&key).cloned();
        raw.map(|raw| decode(&key, &raw)).transpose()
    }

    async fn save_progress(&self, key: &ProgressKey, record: &ProgressRecord) -> Result<(), StorageError> {
        let value = encode(record)?;
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn current_session(&self) -> Result<Option<SessionContext>, StorageError> {
        let raw = self.lock()?.get(SESSION_KEY).cloned();
        raw.map(|raw| decode(SESSION_KEY, &raw)).transpose()
    }

    async fn save_session(&self, session: &SessionContext) -> Result<(), StorageError> {
        let value = encode(session)?;
        self.lock()?.insert(SESSION_KEY.to_owned(), value);
        Ok(())
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        self.lock()?.remove(SESSION_KEY);
        Ok(())
    }
}

/// Aggregates local repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn LocalProgressRepository>,
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn LocalProgressRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo);
        Self { progress, sessions }
    }
}
