use vocab_core::model::{Lesson, LessonId};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, lesson_id_from_i64, map_lesson_row, write_err};
use crate::repository::{LessonRepository, StorageError};

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn insert_lesson(&self, name: &str) -> Result<Lesson, StorageError> {
        let res = sqlx::query("INSERT INTO lessons (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;

        let id = lesson_id_from_i64(res.last_insert_rowid())?;
        Lesson::new(id, name).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query("SELECT id, name FROM lessons WHERE id = ?1")
            .bind(id_i64("lesson_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_lesson_row).transpose()
    }

    async fn get_lesson_by_name(&self, name: &str) -> Result<Option<Lesson>, StorageError> {
        let row = sqlx::query("SELECT id, name FROM lessons WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_lesson_row).transpose()
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let rows = sqlx::query("SELECT id, name FROM lessons ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_lesson_row).collect()
    }

    async fn rename_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE lessons SET name = ?1 WHERE id = ?2")
            .bind(lesson.name())
            .bind(id_i64("lesson_id", lesson.id().value())?)
            .execute(&self.pool)
            .await
            .map_err(write_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_lesson(&self, id: LessonId) -> Result<(), StorageError> {
        // words and session_records go with it via ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(id_i64("lesson_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
