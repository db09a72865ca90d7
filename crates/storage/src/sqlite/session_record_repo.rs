use sqlx::Row;
use vocab_core::model::{LessonId, SessionRecord, StoredSessionRecord};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_record_row, ser, u32_from_i64, write_err};
use crate::repository::{SessionRecordRepository, StorageError};

#[async_trait::async_trait]
impl SessionRecordRepository for SqliteRepository {
    async fn insert_session_record(&self, record: &SessionRecord) -> Result<i64, StorageError> {
        let lesson_id = id_i64("lesson_id", record.lesson_id().value())?;

        let res = sqlx::query(
            r"
                INSERT INTO session_records (
                    lesson_id, started_at, ended_at, duration_ms,
                    total_words, correct_answers, incorrect_answers
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(lesson_id)
        .bind(record.started_at())
        .bind(record.ended_at())
        .bind(record.duration().num_milliseconds())
        .bind(i64::from(record.total_words()))
        .bind(i64::from(record.correct_answers()))
        .bind(i64::from(record.incorrect_answers()))
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(res.last_insert_rowid())
    }

    async fn list_session_records(&self) -> Result<Vec<StoredSessionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, lesson_id, started_at, ended_at,
                    total_words, correct_answers, incorrect_answers
                FROM session_records
                ORDER BY started_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_record_row(&row)?);
        }
        Ok(out)
    }

    async fn total_study_time_millis(&self) -> Result<i64, StorageError> {
        let row = sqlx::query("SELECT COALESCE(SUM(duration_ms), 0) AS total FROM session_records")
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;

        row.try_get::<i64, _>("total").map_err(ser)
    }

    async fn completion_count_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<u32, StorageError> {
        let row = sqlx::query("SELECT COUNT(id) AS n FROM session_records WHERE lesson_id = ?1")
            .bind(id_i64("lesson_id", lesson_id.value())?)
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;

        u32_from_i64("count", row.try_get::<i64, _>("n").map_err(ser)?)
    }

    async fn clear_all_session_records(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_records")
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
