use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionRecordError {
    #[error("ended_at is before started_at")]
    InvalidTimeRange,

    #[error("answered words ({answered}) exceed total words ({total})")]
    CountMismatch { total: u32, answered: u32 },
}

/// Which words a study session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyMode {
    /// All enabled words of one lesson; completed runs are recorded.
    Lesson(LessonId),
    /// The currently weakest words across all lessons; never recorded.
    WorstWordsPractice,
}

impl StudyMode {
    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        match self {
            StudyMode::Lesson(id) => *id,
            StudyMode::WorstWordsPractice => LessonId::NONE,
        }
    }

    #[must_use]
    pub fn is_practice(&self) -> bool {
        matches!(self, StudyMode::WorstWordsPractice)
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            StudyMode::Lesson(_) => "Studying Lesson",
            StudyMode::WorstWordsPractice => "Practicing Worst Words",
        }
    }
}

/// Immutable outcome of one completed lesson session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    lesson_id: LessonId,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
    total_words: u32,
    correct_answers: u32,
    incorrect_answers: u32,
}

impl SessionRecord {
    /// Build a record, checking the time range and answer counts.
    ///
    /// # Errors
    ///
    /// Returns `SessionRecordError::InvalidTimeRange` if `ended_at` precedes `started_at`.
    /// Returns `SessionRecordError::CountMismatch` if more answers than words are recorded.
    pub fn new(
        lesson_id: LessonId,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
        total_words: u32,
        correct_answers: u32,
        incorrect_answers: u32,
    ) -> Result<Self, SessionRecordError> {
        if ended_at < started_at {
            return Err(SessionRecordError::InvalidTimeRange);
        }
        let answered = correct_answers.saturating_add(incorrect_answers);
        if answered > total_words {
            return Err(SessionRecordError::CountMismatch {
                total: total_words,
                answered,
            });
        }

        Ok(Self {
            lesson_id,
            started_at,
            ended_at,
            total_words,
            correct_answers,
            incorrect_answers,
        })
    }

    #[must_use]
    pub fn lesson_id(&self) -> LessonId {
        self.lesson_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.ended_at - self.started_at
    }

    #[must_use]
    pub fn total_words(&self) -> u32 {
        self.total_words
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn incorrect_answers(&self) -> u32 {
        self.incorrect_answers
    }
}

/// A persisted record together with its storage row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSessionRecord {
    pub id: i64,
    pub record: SessionRecord,
}
