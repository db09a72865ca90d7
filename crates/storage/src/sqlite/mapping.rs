use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use vocab_core::model::{
    Lesson, LessonId, SessionRecord, StoredSessionRecord, WordEntry, WordId, WordStats,
};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Maps unique violations to `Conflict` and foreign key violations to `NotFound`.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    let (unique, foreign_key) = e.as_database_error().map_or((false, false), |db| {
        (db.is_unique_violation(), db.is_foreign_key_violation())
    });
    if unique {
        StorageError::Conflict
    } else if foreign_key {
        StorageError::NotFound
    } else {
        conn(e)
    }
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn lesson_id_from_i64(v: i64) -> Result<LessonId, StorageError> {
    Ok(LessonId::new(i64_to_u64("lesson_id", v)?))
}

pub(crate) fn word_id_from_i64(v: i64) -> Result<WordId, StorageError> {
    Ok(WordId::new(i64_to_u64("word_id", v)?))
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    let id = lesson_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let name: String = row.try_get("name").map_err(ser)?;
    Lesson::new(id, name).map_err(ser)
}

pub(crate) fn map_word_row(row: &SqliteRow) -> Result<WordEntry, StorageError> {
    let stats = WordStats::new(
        u32_from_i64(
            "times_presented",
            row.try_get::<i64, _>("times_presented").map_err(ser)?,
        )?,
        u32_from_i64(
            "times_correct",
            row.try_get::<i64, _>("times_correct").map_err(ser)?,
        )?,
        u32_from_i64(
            "times_incorrect",
            row.try_get::<i64, _>("times_incorrect").map_err(ser)?,
        )?,
    );

    Ok(WordEntry {
        id: word_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        lesson_id: lesson_id_from_i64(row.try_get::<i64, _>("lesson_id").map_err(ser)?)?,
        source_term: row.try_get("source_term").map_err(ser)?,
        target_term: row.try_get("target_term").map_err(ser)?,
        enabled: row.try_get::<i64, _>("enabled").map_err(ser)? != 0,
        stats,
    })
}

pub(crate) fn map_record_row(row: &SqliteRow) -> Result<StoredSessionRecord, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let lesson_id = lesson_id_from_i64(row.try_get::<i64, _>("lesson_id").map_err(ser)?)?;
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    let ended_at: DateTime<Utc> = row.try_get("ended_at").map_err(ser)?;
    let total_words = u32_from_i64(
        "total_words",
        row.try_get::<i64, _>("total_words").map_err(ser)?,
    )?;
    let correct = u32_from_i64(
        "correct_answers",
        row.try_get::<i64, _>("correct_answers").map_err(ser)?,
    )?;
    let incorrect = u32_from_i64(
        "incorrect_answers",
        row.try_get::<i64, _>("incorrect_answers").map_err(ser)?,
    )?;

    let record = SessionRecord::new(
        lesson_id,
        started_at,
        ended_at,
        total_words,
        correct,
        incorrect,
    )
    .map_err(ser)?;
    Ok(StoredSessionRecord { id, record })
}
