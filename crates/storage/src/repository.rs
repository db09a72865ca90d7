use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use vocab_core::model::{
    Lesson, LessonId, SessionRecord, StoredSessionRecord, WordEntry, WordId, WordPair,
};
use vocab_core::ranking::worst_word_order;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for lessons.
#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// Insert a lesson with an already-normalized name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if a lesson with that name exists.
    async fn insert_lesson(&self, name: &str) -> Result<Lesson, StorageError>;

    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError>;

    /// Fetch a lesson by exact name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_lesson_by_name(&self, name: &str) -> Result<Option<Lesson>, StorageError>;

    /// List all lessons ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError>;

    /// Persist a new name for an existing lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, `StorageError::Conflict` on a name clash.
    async fn rename_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;

    /// Delete a lesson together with its words and session records.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing.
    async fn delete_lesson(&self, id: LessonId) -> Result<(), StorageError>;
}

/// Repository contract for word entries.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Insert enabled words with zeroed statistics.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the lesson does not exist.
    async fn insert_words(
        &self,
        lesson_id: LessonId,
        pairs: &[WordPair],
    ) -> Result<Vec<WordId>, StorageError>;

    /// Fetch a single word.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_word(&self, id: WordId) -> Result<Option<WordEntry>, StorageError>;

    /// All words of a lesson ordered by source term.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError>;

    /// Enabled words of a lesson, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn enabled_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn set_word_enabled(&self, id: WordId, enabled: bool) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn delete_word(&self, id: WordId) -> Result<(), StorageError>;

    /// Presented words, weakest first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn worst_word_candidates(&self, limit: u32) -> Result<Vec<WordEntry>, StorageError>;
}

/// Per-word study counters.
///
/// Each increment is a separate event; callers must not replay them.
#[async_trait]
pub trait WordStatsRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn increment_presented(&self, id: WordId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn increment_correct(&self, id: WordId) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the word does not exist.
    async fn increment_incorrect(&self, id: WordId) -> Result<(), StorageError>;

    /// Zero every word's counters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn reset_all_word_stats(&self) -> Result<(), StorageError>;
}

#[async_trait]
pub trait SessionRecordRepository: Send + Sync {
    /// Append a session record and return its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the lesson does not exist.
    async fn insert_session_record(&self, record: &SessionRecord) -> Result<i64, StorageError>;

    /// All records, newest start first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_session_records(&self) -> Result<Vec<StoredSessionRecord>, StorageError>;

    /// Sum of all session durations; zero when there are none.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn total_study_time_millis(&self) -> Result<i64, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn completion_count_for_lesson(&self, lesson_id: LessonId)
    -> Result<u32, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear_all_session_records(&self) -> Result<(), StorageError>;
}

/// Key-value user preferences.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn selected_lesson_ids(&self) -> Result<BTreeSet<LessonId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn set_selected_lesson_ids(&self, ids: &BTreeSet<LessonId>)
    -> Result<(), StorageError>;
}

#[derive(Default)]
struct InMemoryState {
    lessons: HashMap<LessonId, Lesson>,
    words: BTreeMap<WordId, WordEntry>,
    records: Vec<StoredSessionRecord>,
    selected_lessons: BTreeSet<LessonId>,
    next_lesson_id: u64,
    next_word_id: u64,
    next_record_id: i64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    fn update_word<F>(&self, id: WordId, f: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut WordEntry),
    {
        let mut guard = self.lock()?;
        let word = guard.words.get_mut(&id).ok_or(StorageError::NotFound)?;
        f(word);
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn insert_lesson(&self, name: &str) -> Result<Lesson, StorageError> {
        let mut guard = self.lock()?;
        if guard.lessons.values().any(|l| l.name() == name) {
            return Err(StorageError::Conflict);
        }
        guard.next_lesson_id += 1;
        let lesson = Lesson::new(LessonId::new(guard.next_lesson_id), name)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        guard.lessons.insert(lesson.id(), lesson.clone());
        Ok(lesson)
    }

    async fn get_lesson(&self, id: LessonId) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.lessons.get(&id).cloned())
    }

    async fn get_lesson_by_name(&self, name: &str) -> Result<Option<Lesson>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.lessons.values().find(|l| l.name() == name).cloned())
    }

    async fn list_lessons(&self) -> Result<Vec<Lesson>, StorageError> {
        let guard = self.lock()?;
        let mut lessons: Vec<Lesson> = guard.lessons.values().cloned().collect();
        lessons.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(lessons)
    }

    async fn rename_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.lessons.contains_key(&lesson.id()) {
            return Err(StorageError::NotFound);
        }
        if guard
            .lessons
            .values()
            .any(|l| l.id() != lesson.id() && l.name() == lesson.name())
        {
            return Err(StorageError::Conflict);
        }
        guard.lessons.insert(lesson.id(), lesson.clone());
        Ok(())
    }

    async fn delete_lesson(&self, id: LessonId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if guard.lessons.remove(&id).is_none() {
            return Err(StorageError::NotFound);
        }
        guard.words.retain(|_, w| w.lesson_id != id);
        guard.records.retain(|r| r.record.lesson_id() != id);
        Ok(())
    }
}

#[async_trait]
impl WordRepository for InMemoryRepository {
    async fn insert_words(
        &self,
        lesson_id: LessonId,
        pairs: &[WordPair],
    ) -> Result<Vec<WordId>, StorageError> {
        let mut guard = self.lock()?;
        if !guard.lessons.contains_key(&lesson_id) {
            return Err(StorageError::NotFound);
        }
        let mut ids = Vec::with_capacity(pairs.len());
        for pair in pairs {
            guard.next_word_id += 1;
            let id = WordId::new(guard.next_word_id);
            guard.words.insert(id, pair.clone().assign_id(id, lesson_id));
            ids.push(id);
        }
        Ok(ids)
    }

    async fn get_word(&self, id: WordId) -> Result<Option<WordEntry>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.words.get(&id).cloned())
    }

    async fn list_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError> {
        let guard = self.lock()?;
        let mut words: Vec<WordEntry> = guard
            .words
            .values()
            .filter(|w| w.lesson_id == lesson_id)
            .cloned()
            .collect();
        words.sort_by(|a, b| a.source_term.cmp(&b.source_term).then(a.id.cmp(&b.id)));
        Ok(words)
    }

    async fn enabled_words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .words
            .values()
            .filter(|w| w.lesson_id == lesson_id && w.enabled)
            .cloned()
            .collect())
    }

    async fn set_word_enabled(&self, id: WordId, enabled: bool) -> Result<(), StorageError> {
        self.update_word(id, |w| w.enabled = enabled)
    }

    async fn delete_word(&self, id: WordId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .words
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn worst_word_candidates(&self, limit: u32) -> Result<Vec<WordEntry>, StorageError> {
        let guard = self.lock()?;
        let mut words: Vec<WordEntry> = guard
            .words
            .values()
            .filter(|w| w.stats.was_presented())
            .cloned()
            .collect();
        words.sort_by(worst_word_order);
        words.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(words)
    }
}

#[async_trait]
impl WordStatsRepository for InMemoryRepository {
    async fn increment_presented(&self, id: WordId) -> Result<(), StorageError> {
        self.update_word(id, |w| w.stats.record_presented())
    }

    async fn increment_correct(&self, id: WordId) -> Result<(), StorageError> {
        self.update_word(id, |w| w.stats.record_correct())
    }

    async fn increment_incorrect(&self, id: WordId) -> Result<(), StorageError> {
        self.update_word(id, |w| w.stats.record_incorrect())
    }

    async fn reset_all_word_stats(&self) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        for word in guard.words.values_mut() {
            word.stats.reset();
        }
        Ok(())
    }
}

#[async_trait]
impl SessionRecordRepository for InMemoryRepository {
    async fn insert_session_record(&self, record: &SessionRecord) -> Result<i64, StorageError> {
        let mut guard = self.lock()?;
        if !guard.lessons.contains_key(&record.lesson_id()) {
            return Err(StorageError::NotFound);
        }
        guard.next_record_id += 1;
        let id = guard.next_record_id;
        guard.records.push(StoredSessionRecord {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn list_session_records(&self) -> Result<Vec<StoredSessionRecord>, StorageError> {
        let guard = self.lock()?;
        let mut records = guard.records.clone();
        records.sort_by(|a, b| {
            b.record
                .started_at()
                .cmp(&a.record.started_at())
                .then(b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn total_study_time_millis(&self) -> Result<i64, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .records
            .iter()
            .map(|r| r.record.duration().num_milliseconds())
            .sum())
    }

    async fn completion_count_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<u32, StorageError> {
        let guard = self.lock()?;
        let count = guard
            .records
            .iter()
            .filter(|r| r.record.lesson_id() == lesson_id)
            .count();
        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }

    async fn clear_all_session_records(&self) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.records.clear();
        Ok(())
    }
}

#[async_trait]
impl PreferencesRepository for InMemoryRepository {
    async fn selected_lesson_ids(&self) -> Result<BTreeSet<LessonId>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.selected_lessons.clone())
    }

    async fn set_selected_lesson_ids(
        &self,
        ids: &BTreeSet<LessonId>,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.selected_lessons = ids.clone();
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub lessons: Arc<dyn LessonRepository>,
    pub words: Arc<dyn WordRepository>,
    pub word_stats: Arc<dyn WordStatsRepository>,
    pub session_records: Arc<dyn SessionRecordRepository>,
    pub preferences: Arc<dyn PreferencesRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Share one backend across every repository slot.
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: LessonRepository
            + WordRepository
            + WordStatsRepository
            + SessionRecordRepository
            + PreferencesRepository
            + Clone
            + 'static,
    {
        Self {
            lessons: Arc::new(repo.clone()),
            words: Arc::new(repo.clone()),
            word_stats: Arc::new(repo.clone()),
            session_records: Arc::new(repo.clone()),
            preferences: Arc::new(repo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use vocab_core::time::fixed_now;

    fn pairs(raw: &[(&str, &str)]) -> Vec<WordPair> {
        raw.iter()
            .map(|(s, t)| WordPair::new(s, t).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn duplicate_lesson_names_conflict() {
        let repo = InMemoryRepository::new();
        repo.insert_lesson("Animals").await.unwrap();
        let err = repo.insert_lesson("Animals").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn enabled_words_skip_disabled_entries() {
        let repo = InMemoryRepository::new();
        let lesson = repo.insert_lesson("Animals").await.unwrap();
        let ids = repo
            .insert_words(lesson.id(), &pairs(&[("hund", "dog"), ("katt", "cat")]))
            .await
            .unwrap();
        repo.set_word_enabled(ids[0], false).await.unwrap();

        let enabled = repo.enabled_words_for_lesson(lesson.id()).await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].source_term, "katt");
    }

    #[tokio::test]
    async fn deleting_lesson_cascades() {
        let repo = InMemoryRepository::new();
        let lesson = repo.insert_lesson("Animals").await.unwrap();
        let ids = repo
            .insert_words(lesson.id(), &pairs(&[("hund", "dog")]))
            .await
            .unwrap();
        let now = fixed_now();
        let record =
            SessionRecord::new(lesson.id(), now, now + Duration::seconds(5), 1, 1, 0).unwrap();
        repo.insert_session_record(&record).await.unwrap();

        repo.delete_lesson(lesson.id()).await.unwrap();

        assert!(repo.get_word(ids[0]).await.unwrap().is_none());
        assert!(repo.list_session_records().await.unwrap().is_empty());
        assert_eq!(repo.total_study_time_millis().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn increments_on_missing_word_report_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.increment_presented(WordId::new(99)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn worst_candidates_follow_ranking() {
        let repo = InMemoryRepository::new();
        let lesson = repo.insert_lesson("Mixed").await.unwrap();
        let ids = repo
            .insert_words(
                lesson.id(),
                &pairs(&[("bat", "x"), ("ant", "y"), ("cow", "z")]),
            )
            .await
            .unwrap();
        for id in &ids[..2] {
            repo.increment_presented(*id).await.unwrap();
            repo.increment_incorrect(*id).await.unwrap();
        }

        let worst = repo.worst_word_candidates(10).await.unwrap();
        let terms: Vec<&str> = worst.iter().map(|w| w.source_term.as_str()).collect();
        assert_eq!(terms, vec!["ant", "bat"]);
    }
}
