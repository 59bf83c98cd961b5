use async_trait::async_trait;
use chrono::Utc;
use quiz_core::model::SessionSnapshot;
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{SessionSnapshotRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionSnapshotRepository for SqliteRepository {
    async fn load_snapshot(&self, scope: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM session_snapshots WHERE scope = ?1")
            .bind(scope)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let payload: String = row.try_get("payload").map_err(ser)?;
        SessionSnapshot::from_json(&payload).map(Some).map_err(ser)
    }

    async fn save_snapshot(
        &self,
        scope: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = snapshot.to_json().map_err(ser)?;
        sqlx::query(
            r"
            INSERT INTO session_snapshots (scope, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(scope) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(scope)
        .bind(payload)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn clear_snapshot(&self, scope: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_snapshots WHERE scope = ?1")
            .bind(scope)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
