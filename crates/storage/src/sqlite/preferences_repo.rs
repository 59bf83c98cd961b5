use async_trait::async_trait;
use quiz_core::model::{Preferences, QuestionLimit, Theme};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{PreferencesRepository, StorageError};

#[async_trait]
impl PreferencesRepository for SqliteRepository {
    async fn get_preferences(&self) -> Result<Option<Preferences>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT theme, question_limit
            FROM preferences
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let theme: String = row
            .try_get("theme")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let question_limit: i64 = row
            .try_get("question_limit")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        let theme = theme
            .parse::<Theme>()
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let limit = u32::try_from(question_limit).map_err(|_| {
            StorageError::Serialization(format!("invalid question_limit: {question_limit}"))
        })?;

        Ok(Some(Preferences {
            theme,
            limit: QuestionLimit::new(limit),
        }))
    }

    async fn save_preferences(&self, preferences: &Preferences) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO preferences (id, theme, question_limit)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                theme = excluded.theme,
                question_limit = excluded.question_limit
            ",
        )
        .bind(1_i64)
        .bind(preferences.theme.as_str())
        .bind(i64::from(preferences.limit.value()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
