use async_trait::async_trait;
use quiz_core::model::{Preferences, SessionSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Store for the session snapshot of one scope.
///
/// A scope plays the role of a browser tab: snapshots written under one scope
/// are only read back by the same scope. Every save replaces the whole blob.
#[async_trait]
pub trait SessionSnapshotRepository: Send + Sync {
    /// Fetch the snapshot for `scope`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored blob is unreadable,
    /// or other storage errors.
    async fn load_snapshot(&self, scope: &str) -> Result<Option<SessionSnapshot>, StorageError>;

    /// Overwrite the snapshot for `scope`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be stored.
    async fn save_snapshot(&self, scope: &str, snapshot: &SessionSnapshot)
    -> Result<(), StorageError>;

    /// Remove the snapshot for `scope`. Missing snapshots are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear_snapshot(&self, scope: &str) -> Result<(), StorageError>;
}

/// Store for user display preferences.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_preferences(&self) -> Result<Option<Preferences>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the preferences cannot be stored.
    async fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Snapshots are kept as serialized JSON so reads go through the same
/// validation as a real backend.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    snapshots: Arc<Mutex<HashMap<String, String>>>,
    preferences: Arc<Mutex<Option<Preferences>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored payload for `scope`; handy for asserting on the blob format.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_snapshot(&self, scope: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(scope).cloned())
    }

    /// Store an arbitrary payload for `scope`, bypassing serialization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn put_raw_snapshot(&self, scope: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(scope.to_string(), payload.to_string());
        Ok(())
    }
}

#[async_trait]
impl SessionSnapshotRepository for InMemoryRepository {
    async fn load_snapshot(&self, scope: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        let Some(payload) = self.raw_snapshot(scope)? else {
            return Ok(None);
        };
        SessionSnapshot::from_json(&payload)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn save_snapshot(
        &self,
        scope: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = snapshot
            .to_json()
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.put_raw_snapshot(scope, &payload)
    }

    async fn clear_snapshot(&self, scope: &str) -> Result<(), StorageError> {
        let mut guard = self
            .snapshots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(scope);
        Ok(())
    }
}

#[async_trait]
impl PreferencesRepository for InMemoryRepository {
    async fn get_preferences(&self) -> Result<Option<Preferences>, StorageError> {
        let guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError> {
        let mut guard = self
            .preferences
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*preferences);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub snapshots: Arc<dyn SessionSnapshotRepository>,
    pub preferences: Arc<dyn PreferencesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let snapshots: Arc<dyn SessionSnapshotRepository> = Arc::new(repo.clone());
        let preferences: Arc<dyn PreferencesRepository> = Arc::new(repo);
        Self {
            snapshots,
            preferences,
        }
    }
}
