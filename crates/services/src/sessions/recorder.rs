use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use storage::repository::SessionRecordRepository;
use vocab_core::model::SessionRecord;

use super::state::SessionState;

/// Persists one `SessionRecord` per finished lesson run.
#[derive(Clone)]
pub struct SessionStatsRecorder {
    records: Arc<dyn SessionRecordRepository>,
}

impl SessionStatsRecorder {
    #[must_use]
    pub fn new(records: Arc<dyn SessionRecordRepository>) -> Self {
        Self { records }
    }

    /// Save the session's final counters, ending it at `ended_at`.
    ///
    /// Skipped for practice runs, for the `NONE` lesson, when this state was
    /// already saved, and when a non-empty session has no positive duration.
    /// The state is marked saved before the write, so a failed write is not
    /// retried. Returns the new record id on success.
    pub async fn save(&self, state: &mut SessionState, ended_at: DateTime<Utc>) -> Option<i64> {
        let mode = state.mode();
        if state.is_stats_saved() || mode.is_practice() {
            return None;
        }
        let lesson_id = mode.lesson_id();
        if lesson_id.is_none() {
            tracing::debug!("not recording a session without a lesson");
            return None;
        }

        let started_at = state.started_at();
        let duration = ended_at - started_at;
        if duration <= Duration::zero() && !state.words().is_empty() {
            tracing::debug!(
                %lesson_id,
                duration_ms = duration.num_milliseconds(),
                "not recording a session without elapsed time"
            );
            return None;
        }

        let summary = state.summary();
        let record = match SessionRecord::new(
            lesson_id,
            started_at,
            ended_at,
            summary.total_words,
            summary.correct,
            summary.incorrect,
        ) {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(%lesson_id, error = %err, "invalid session record");
                return None;
            }
        };

        state.mark_stats_saved();
        match self.records.insert_session_record(&record).await {
            Ok(id) => {
                tracing::info!(
                    %lesson_id,
                    record_id = id,
                    duration_ms = duration.num_milliseconds(),
                    "session recorded"
                );
                Some(id)
            }
            Err(err) => {
                tracing::error!(%lesson_id, error = %err, "failed to save session record");
                None
            }
        }
    }
}
