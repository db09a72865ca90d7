use std::sync::Arc;

use storage::repository::Storage;
use vocab_core::model::StudyMode;

use crate::Clock;
use crate::error::{AppServicesError, SessionError};
use crate::lesson_service::LessonService;
use crate::preferences_service::PreferencesService;
use crate::ranking_service::RankingEngine;
use crate::sessions::{SessionContext, SessionEngine};

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    sessions: SessionContext,
    lessons: Arc<LessonService>,
    statistics: Arc<RankingEngine>,
    preferences: Arc<PreferencesService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an existing storage handle.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        Self {
            sessions: SessionContext::from_storage(clock, storage),
            lessons: Arc::new(LessonService::new(
                Arc::clone(&storage.lessons),
                Arc::clone(&storage.words),
            )),
            statistics: Arc::new(RankingEngine::new(storage)),
            preferences: Arc::new(PreferencesService::new(
                Arc::clone(&storage.preferences),
                Arc::clone(&storage.lessons),
            )),
        }
    }

    /// Start a study session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the word list cannot be loaded.
    pub async fn start_session(&self, mode: StudyMode) -> Result<SessionEngine, SessionError> {
        SessionEngine::start(self.sessions.clone(), mode).await
    }

    #[must_use]
    pub fn session_context(&self) -> SessionContext {
        self.sessions.clone()
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<RankingEngine> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn preferences(&self) -> Arc<PreferencesService> {
        Arc::clone(&self.preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::time::fixed_clock;

    #[tokio::test]
    async fn sqlite_bootstrap_wires_services() {
        let app = AppServices::new_sqlite(
            "sqlite:file:memdb_app_services?mode=memory&cache=shared",
            fixed_clock(),
        )
        .await
        .unwrap();

        let lesson = app.lessons().create_lesson("Basics").await.unwrap();
        app.preferences().toggle_lesson(lesson.id()).await.unwrap();

        let engine = app.start_session(StudyMode::Lesson(lesson.id())).await.unwrap();
        assert!(engine.snapshot().finished);
        let overview = app.statistics().overview().await.unwrap();
        assert_eq!(overview.completions[0].completion_count, 0);
        assert_eq!(
            app.preferences().selected_lessons().await.unwrap().len(),
            1
        );
    }
}
