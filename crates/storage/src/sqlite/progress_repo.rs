use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::repository::{
    PROGRESS_KEY, ProgressRepository, StorageError, decode_progress, encode_progress,
};
use lingo_core::model::UserProgress;

use super::SqliteRepository;

impl SqliteRepository {
    /// Read a raw slot value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        row.try_get::<String, _>("value")
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Overwrite a raw slot value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub async fn put_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self) -> Result<Option<UserProgress>, StorageError> {
        let raw = self.get_raw(PROGRESS_KEY).await?;
        raw.as_deref().map(decode_progress).transpose()
    }

    async fn save_progress(&self, progress: &UserProgress) -> Result<(), StorageError> {
        let payload = encode_progress(progress)?;
        self.put_raw(PROGRESS_KEY, &payload).await
    }
}
