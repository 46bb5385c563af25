use async_trait::async_trait;
use chrono::NaiveDate;
use lingo_core::model::{ProgressError, UserProgress};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Name of the single slot holding the learner's progress.
pub const PROGRESS_KEY: &str = "lingopop-stats";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted JSON shape of the progress record.
///
/// `level` is written so the payload stays self-describing, but it is ignored
/// when rehydrating: the domain always derives it from `xp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub name: String,
    pub xp: u64,
    pub streak: u32,
    pub last_login_date: NaiveDate,
    pub words_learned: u32,
    pub lessons_completed: u32,
    #[serde(default)]
    pub level: u32,
}

impl ProgressRecord {
    #[must_use]
    pub fn from_progress(progress: &UserProgress) -> Self {
        Self {
            name: progress.name().to_owned(),
            xp: progress.xp(),
            streak: progress.streak(),
            last_login_date: progress.last_login_date(),
            words_learned: progress.words_learned(),
            lessons_completed: progress.lessons_completed(),
            level: progress.level(),
        }
    }

    /// Convert the record back into a domain `UserProgress`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the record violates a domain invariant.
    pub fn into_progress(self) -> Result<UserProgress, ProgressError> {
        UserProgress::from_persisted(
            self.name,
            self.xp,
            self.streak,
            self.last_login_date,
            self.words_learned,
            self.lessons_completed,
        )
    }

    /// Serialize to the JSON payload stored in the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Parse a stored payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the payload is not a valid record.
    pub fn from_json(raw: &str) -> Result<Self, StorageError> {
        serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }
}

/// Decode a stored payload straight into the domain type.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON or invalid field values.
pub fn decode_progress(raw: &str) -> Result<UserProgress, StorageError> {
    ProgressRecord::from_json(raw)?
        .into_progress()
        .map_err(|err| StorageError::Serialization(err.to_string()))
}

/// Encode the domain type into the stored payload.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails.
pub fn encode_progress(progress: &UserProgress) -> Result<String, StorageError> {
    ProgressRecord::from_progress(progress).to_json()
}

/// Repository contract for the single progress slot.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Read the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the slot holds an unreadable
    /// payload, or other storage errors. An empty slot is `Ok(None)`.
    async fn load_progress(&self) -> Result<Option<UserProgress>, StorageError>;

    /// Overwrite the slot with the given record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError>;
}

/// In-memory slot for tests and prototyping. Holds the encoded payload so
/// reads go through the same codec as durable backends.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with an arbitrary payload.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The payload currently stored, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        let raw = self.raw()?;
        raw.as_deref().map(decode_progress).transpose()
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        let payload = encode_progress(progress)?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(payload);
        Ok(())
    }
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn ProgressRepository> = Arc::new(InMemoryRepository::new());
        Self { progress }
    }
}
