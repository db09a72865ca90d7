use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::Row;
use vocab_core::model::LessonId;

use super::SqliteRepository;
use super::mapping::{conn, ser};
use crate::repository::{PreferencesRepository, StorageError};

const SELECTED_LESSON_IDS: &str = "selected_lesson_ids";

fn encode_ids(ids: &BTreeSet<LessonId>) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_ids(raw: &str) -> Result<BTreeSet<LessonId>, StorageError> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<LessonId>().map_err(ser))
        .collect()
}

#[async_trait]
impl PreferencesRepository for SqliteRepository {
    async fn selected_lesson_ids(&self) -> Result<BTreeSet<LessonId>, StorageError> {
        let row = sqlx::query("SELECT value FROM preferences WHERE key = ?1")
            .bind(SELECTED_LESSON_IDS)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(BTreeSet::new());
        };
        let raw: String = row.try_get("value").map_err(ser)?;
        decode_ids(&raw)
    }

    async fn set_selected_lesson_ids(
        &self,
        ids: &BTreeSet<LessonId>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO preferences (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            ",
        )
        .bind(SELECTED_LESSON_IDS)
        .bind(encode_ids(ids))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}
