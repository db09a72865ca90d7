use std::sync::Arc;

use chrono::Duration;
use storage::repository::{LessonRepository, SessionRecordRepository, Storage, WordRepository};
use vocab_core::model::{LessonId, WordEntry};
use vocab_core::ranking::{LessonCompletion, WORST_WORDS_LIMIT, lesson_completions, rank_worst_words};
use vocab_core::time::format_study_time;

use crate::error::StatisticsError;
use crate::sessions::WordStatsTracker;

/// Everything a statistics screen shows at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsOverview {
    pub worst_words: Vec<WordEntry>,
    pub completions: Vec<LessonCompletion>,
    pub total_study_time: Duration,
    pub total_study_time_text: String,
}

/// Read side of study statistics, plus the bulk reset.
#[derive(Clone)]
pub struct RankingEngine {
    lessons: Arc<dyn LessonRepository>,
    words: Arc<dyn WordRepository>,
    records: Arc<dyn SessionRecordRepository>,
    tracker: WordStatsTracker,
}

impl RankingEngine {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        Self {
            lessons: Arc::clone(&storage.lessons),
            words: Arc::clone(&storage.words),
            records: Arc::clone(&storage.session_records),
            tracker: WordStatsTracker::new(Arc::clone(&storage.word_stats)),
        }
    }

    /// The `limit` weakest words among those presented at least once.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if repository access fails.
    pub async fn worst_words(&self, limit: usize) -> Result<Vec<WordEntry>, StatisticsError> {
        let fetch = u32::try_from(limit).unwrap_or(u32::MAX);
        let candidates = self.words.worst_word_candidates(fetch).await?;
        Ok(rank_worst_words(candidates, limit))
    }

    /// Recorded sessions per lesson, busiest first.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if repository access fails.
    pub async fn lesson_completion_counts(
        &self,
    ) -> Result<Vec<LessonCompletion>, StatisticsError> {
        let lessons = self.lessons.list_lessons().await?;
        let records = self.records.list_session_records().await?;
        Ok(lesson_completions(&lessons, &records))
    }

    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if repository access fails.
    pub async fn completion_count(&self, lesson_id: LessonId) -> Result<u32, StatisticsError> {
        Ok(self.records.completion_count_for_lesson(lesson_id).await?)
    }

    /// Sum of all recorded session durations.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if repository access fails.
    pub async fn total_study_time(&self) -> Result<Duration, StatisticsError> {
        let millis = self.records.total_study_time_millis().await?;
        Ok(Duration::milliseconds(millis))
    }

    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if repository access fails.
    pub async fn overview(&self) -> Result<StatisticsOverview, StatisticsError> {
        let worst_words = self.worst_words(WORST_WORDS_LIMIT).await?;
        let completions = self.lesson_completion_counts().await?;
        let total_study_time = self.total_study_time().await?;
        Ok(StatisticsOverview {
            worst_words,
            completions,
            total_study_time_text: format_study_time(total_study_time),
            total_study_time,
        })
    }

    /// Delete every session record, then zero every word's counters.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` if either step fails.
    pub async fn clear_all_statistics(&self) -> Result<(), StatisticsError> {
        self.records.clear_all_session_records().await?;
        self.tracker.reset_all().await?;
        tracing::info!("all statistics cleared");
        Ok(())
    }
}
