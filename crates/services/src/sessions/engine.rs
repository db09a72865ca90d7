use std::sync::Arc;

use storage::repository::{SessionRecordRepository, Storage, WordRepository, WordStatsRepository};
use tokio::sync::watch;
use vocab_core::model::StudyMode;

use super::queries::load_session_words;
use super::recorder::SessionStatsRecorder;
use super::snapshot::SessionSnapshot;
use super::state::{Advance, AnswerFeedback, SessionState};
use super::tracker::WordStatsTracker;
use crate::Clock;
use crate::error::SessionError;

//
// ─── CONTEXT ───────────────────────────────────────────────────────────────────
//

/// Collaborators a session needs, shared between runs.
#[derive(Clone)]
pub struct SessionContext {
    clock: Clock,
    words: Arc<dyn WordRepository>,
    tracker: WordStatsTracker,
    recorder: SessionStatsRecorder,
}

impl SessionContext {
    #[must_use]
    pub fn new(
        clock: Clock,
        words: Arc<dyn WordRepository>,
        word_stats: Arc<dyn WordStatsRepository>,
        records: Arc<dyn SessionRecordRepository>,
    ) -> Self {
        Self {
            clock,
            words,
            tracker: WordStatsTracker::new(word_stats),
            recorder: SessionStatsRecorder::new(records),
        }
    }

    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            clock,
            Arc::clone(&storage.words),
            Arc::clone(&storage.word_stats),
            Arc::clone(&storage.session_records),
        )
    }
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Drives one study session: presenting words, checking answers and
/// recording the finished run.
///
/// Calls take `&mut self`; a single caller owns the engine.
pub struct SessionEngine {
    ctx: SessionContext,
    state: SessionState,
    updates: watch::Sender<SessionSnapshot>,
}

impl SessionEngine {
    /// Load the words for `mode` and show the first one.
    ///
    /// An empty selection yields an engine that is already finished.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the word list cannot be loaded.
    pub async fn start(ctx: SessionContext, mode: StudyMode) -> Result<Self, SessionError> {
        let state = fresh_state(&ctx, mode).await?;
        let (updates, _) = watch::channel(SessionSnapshot::from_state(&state));
        Ok(Self {
            ctx,
            state,
            updates,
        })
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.state.mode()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::from_state(&self.state)
    }

    /// Receive a new snapshot after every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    /// Mutable access to the session clock. A fixed clock can be advanced
    /// between calls.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.ctx.clock
    }

    /// Check the answer for the current word.
    ///
    /// Returns `None` when there is no word on screen or it was already
    /// checked.
    pub async fn check_answer(&mut self, user_answer: &str) -> Option<AnswerFeedback> {
        let feedback = self.state.check_answer(user_answer)?;
        if feedback.is_correct {
            self.ctx.tracker.increment_correct(feedback.word_id).await;
        } else {
            self.ctx.tracker.increment_incorrect(feedback.word_id).await;
        }
        tracing::debug!(
            word_id = %feedback.word_id,
            correct = feedback.is_correct,
            "answer checked"
        );
        self.publish();
        Some(feedback)
    }

    /// Move to the next word, or finish and record the run after the last.
    pub async fn advance(&mut self) {
        match self.state.advance() {
            Advance::Presented(word_id) => {
                self.ctx.tracker.increment_presented(word_id).await;
            }
            Advance::Finished => {
                let summary = self.state.summary();
                tracing::debug!(
                    mode = ?self.state.mode(),
                    correct = summary.correct,
                    incorrect = summary.incorrect,
                    "session finished"
                );
                if !self.state.mode().is_practice() {
                    let ended_at = self.ctx.clock.now();
                    self.ctx.recorder.save(&mut self.state, ended_at).await;
                }
            }
            Advance::Ignored => return,
        }
        self.publish();
    }

    /// Throw the current run away and start over with the same selection.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the word list cannot be reloaded;
    /// the previous state is kept in that case.
    pub async fn restart(&mut self) -> Result<(), SessionError> {
        self.state = fresh_state(&self.ctx, self.state.mode()).await?;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }
}

async fn fresh_state(ctx: &SessionContext, mode: StudyMode) -> Result<SessionState, SessionError> {
    let words = load_session_words(mode, ctx.words.as_ref()).await?;
    tracing::debug!(?mode, words = words.len(), "starting session");

    let mut state = SessionState::new(mode, words, ctx.clock.now());
    if let Advance::Presented(word_id) = state.advance() {
        ctx.tracker.increment_presented(word_id).await;
    }
    Ok(state)
}
