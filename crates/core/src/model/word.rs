use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LessonId, WordId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("source term cannot be empty")]
    EmptySourceTerm,

    #[error("target term cannot be empty")]
    EmptyTargetTerm,
}

//
// ─── WORD PAIR ─────────────────────────────────────────────────────────────────
//

/// A validated source/translation pair that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair {
    source_term: String,
    target_term: String,
}

impl WordPair {
    /// Trims both sides and rejects blank terms.
    ///
    /// # Errors
    ///
    /// Returns `WordError` if either side is blank.
    pub fn new(source: impl AsRef<str>, target: impl AsRef<str>) -> Result<Self, WordError> {
        let source_term = source.as_ref().trim();
        let target_term = target.as_ref().trim();
        if source_term.is_empty() {
            return Err(WordError::EmptySourceTerm);
        }
        if target_term.is_empty() {
            return Err(WordError::EmptyTargetTerm);
        }
        Ok(Self {
            source_term: source_term.to_owned(),
            target_term: target_term.to_owned(),
        })
    }

    #[must_use]
    pub fn source_term(&self) -> &str {
        &self.source_term
    }

    #[must_use]
    pub fn target_term(&self) -> &str {
        &self.target_term
    }

    /// Attach storage identity; new words start enabled with zeroed stats.
    #[must_use]
    pub fn assign_id(self, id: WordId, lesson_id: LessonId) -> WordEntry {
        WordEntry {
            id,
            lesson_id,
            source_term: self.source_term,
            target_term: self.target_term,
            enabled: true,
            stats: WordStats::default(),
        }
    }
}

//
// ─── WORD STATS ────────────────────────────────────────────────────────────────
//

/// Cumulative study counters for a single word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStats {
    pub times_presented: u32,
    pub times_correct: u32,
    pub times_incorrect: u32,
}

impl WordStats {
    #[must_use]
    pub fn new(times_presented: u32, times_correct: u32, times_incorrect: u32) -> Self {
        Self {
            times_presented,
            times_correct,
            times_incorrect,
        }
    }

    pub fn record_presented(&mut self) {
        self.times_presented = self.times_presented.saturating_add(1);
    }

    pub fn record_correct(&mut self) {
        self.times_correct = self.times_correct.saturating_add(1);
    }

    pub fn record_incorrect(&mut self) {
        self.times_incorrect = self.times_incorrect.saturating_add(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the word has ever been shown in a session.
    #[must_use]
    pub fn was_presented(&self) -> bool {
        self.times_presented > 0
    }
}

//
// ─── WORD ENTRY ────────────────────────────────────────────────────────────────
//

/// A stored word pair owned by one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: WordId,
    pub lesson_id: LessonId,
    pub source_term: String,
    pub target_term: String,
    pub enabled: bool,
    pub stats: WordStats,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
