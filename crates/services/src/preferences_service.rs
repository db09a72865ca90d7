use std::collections::BTreeSet;
use std::sync::Arc;

use storage::repository::{LessonRepository, PreferencesRepository};
use vocab_core::model::LessonId;

use crate::error::PreferencesError;

/// Reads and updates the user's selected lesson set.
#[derive(Clone)]
pub struct PreferencesService {
    preferences: Arc<dyn PreferencesRepository>,
    lessons: Arc<dyn LessonRepository>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(
        preferences: Arc<dyn PreferencesRepository>,
        lessons: Arc<dyn LessonRepository>,
    ) -> Self {
        Self {
            preferences,
            lessons,
        }
    }

    /// Selected lessons that still exist.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if repository access fails.
    pub async fn selected_lessons(&self) -> Result<BTreeSet<LessonId>, PreferencesError> {
        let stored = self.preferences.selected_lesson_ids().await?;
        let mut live = BTreeSet::new();
        for id in stored {
            if self.lessons.get_lesson(id).await?.is_some() {
                live.insert(id);
            }
        }
        Ok(live)
    }

    /// Add the lesson to the selection, or remove it if already selected.
    ///
    /// Returns whether the lesson is selected afterwards. A stored id whose
    /// lesson was deleted can still be removed.
    ///
    /// # Errors
    ///
    /// Returns `PreferencesError::LessonNotFound` when adding a lesson that
    /// does not exist.
    /// Returns `PreferencesError::Storage` if repository access fails.
    pub async fn toggle_lesson(&self, lesson_id: LessonId) -> Result<bool, PreferencesError> {
        let mut selected = self.preferences.selected_lesson_ids().await?;
        let now_selected = if selected.remove(&lesson_id) {
            false
        } else {
            if self.lessons.get_lesson(lesson_id).await?.is_none() {
                return Err(PreferencesError::LessonNotFound);
            }
            selected.insert(lesson_id);
            true
        };
        self.preferences.set_selected_lesson_ids(&selected).await?;
        Ok(now_selected)
    }

    /// # Errors
    ///
    /// Returns `PreferencesError::Storage` if repository access fails.
    pub async fn clear_selection(&self) -> Result<(), PreferencesError> {
        self.preferences
            .set_selected_lesson_ids(&BTreeSet::new())
            .await?;
        Ok(())
    }
}
