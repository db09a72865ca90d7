use std::sync::Arc;

use storage::repository::{StorageError, WordStatsRepository};
use vocab_core::model::WordId;

/// Forwards per-word study events to storage.
///
/// Increments are best-effort: a failed write is logged and the session
/// carries on.
#[derive(Clone)]
pub struct WordStatsTracker {
    stats: Arc<dyn WordStatsRepository>,
}

impl WordStatsTracker {
    #[must_use]
    pub fn new(stats: Arc<dyn WordStatsRepository>) -> Self {
        Self { stats }
    }

    pub async fn increment_presented(&self, word_id: WordId) {
        if let Err(err) = self.stats.increment_presented(word_id).await {
            tracing::warn!(%word_id, error = %err, "failed to record word presentation");
        }
    }

    pub async fn increment_correct(&self, word_id: WordId) {
        if let Err(err) = self.stats.increment_correct(word_id).await {
            tracing::warn!(%word_id, error = %err, "failed to record correct answer");
        }
    }

    pub async fn increment_incorrect(&self, word_id: WordId) {
        if let Err(err) = self.stats.increment_incorrect(word_id).await {
            tracing::warn!(%word_id, error = %err, "failed to record incorrect answer");
        }
    }

    /// Zero every word's counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the reset fails.
    pub async fn reset_all(&self) -> Result<(), StorageError> {
        self.stats.reset_all_word_stats().await?;
        tracing::info!("word statistics reset");
        Ok(())
    }
}
