use vocab_core::model::{LessonId, WordEntry, WordId, WordPair};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_word_row, word_id_from_i64, write_err};
use crate::repository::{StorageError, WordRepository, WordStatsRepository};

const WORD_COLUMNS: &str = "id, lesson_id, source_term, target_term, enabled, \
     times_presented, times_correct, times_incorrect";

impl SqliteRepository {
    async fn bump_counter(&self, column: &'static str, id: WordId) -> Result<(), StorageError> {
        let sql = format!("UPDATE words SET {column} = {column} + 1 WHERE id = ?1");
        let res = sqlx::query(&sql)
            .bind(id_i64("word_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn fetch_words(
        &self,
        filter: &str,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words WHERE {filter}");
        let rows = sqlx::query(&sql)
            .bind(id_i64("lesson_id", lesson_id.value())?)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_word_row).collect()
    }
}

#[async_trait::async_trait]
impl WordRepository for SqliteRepository {
    async fn insert_words(
        &self,
        lesson_id: LessonId,
        pairs: &[WordPair],
    ) -> Result<Vec<WordId>, StorageError> {
        let lesson = id_i64("lesson_id", lesson_id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let mut ids = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let res = sqlx::query(
                r"
                    INSERT INTO words (lesson_id, source_term, target_term)
                    VALUES (?1, ?2, ?3)
                ",
            )
            .bind(lesson)
            .bind(pair.source_term())
            .bind(pair.target_term())
            .execute(&mut *tx)
            .await
            .map_err(write_err)?;
            ids.push(word_id_from_i64(res.last_insert_rowid())?);
        }

        tx.commit().await.map_err(conn)?;
        Ok(ids)
    }

    async fn get_word(&self, id: WordId) -> Result<Option<WordEntry>, StorageError> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_i64("word_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_word_row).transpose()
    }

    async fn list_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError> {
        self.fetch_words("lesson_id = ?1 ORDER BY source_term ASC, id ASC", lesson_id)
            .await
    }

    async fn enabled_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError> {
        self.fetch_words("lesson_id = ?1 AND enabled = 1 ORDER BY id ASC", lesson_id)
            .await
    }

    async fn set_word_enabled(&self, id: WordId, enabled: bool) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE words SET enabled = ?1 WHERE id = ?2")
            .bind(i64::from(enabled))
            .bind(id_i64("word_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM words WHERE id = ?1")
            .bind(id_i64("word_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn worst_word_candidates(&self, limit: u32) -> Result<Vec<WordEntry>, StorageError> {
        let sql = format!(
            r"
                SELECT {WORD_COLUMNS}
                FROM words
                WHERE times_presented > 0
                ORDER BY times_incorrect DESC, times_presented DESC, source_term ASC, id ASC
                LIMIT ?1
            "
        );
        let rows = sqlx::query(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        rows.iter().map(map_word_row).collect()
    }
}

#[async_trait::async_trait]
impl WordStatsRepository for SqliteRepository {
    async fn increment_presented(&self, id: WordId) -> Result<(), StorageError> {
        self.bump_counter("times_presented", id).await
    }

    async fn increment_correct(&self, id: WordId) -> Result<(), StorageError> {
        self.bump_counter("times_correct", id).await
    }

    async fn increment_incorrect(&self, id: WordId) -> Result<(), StorageError> {
        self.bump_counter("times_incorrect", id).await
    }

    async fn reset_all_word_stats(&self) -> Result<(), StorageError> {
        sqlx::query(
            r"
                UPDATE words
                SET times_presented = 0, times_correct = 0, times_incorrect = 0
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
