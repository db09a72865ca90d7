use std::sync::Arc;

use storage::repository::{LessonRepository, StorageError, WordRepository};
use vocab_core::import::parse_word_list;
use vocab_core::model::{Lesson, LessonId, WordEntry, WordId, WordPair, normalize_lesson_name};

use crate::error::LessonServiceError;

/// Result of importing a comma-delimited word list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    /// 1-based line numbers that were skipped.
    pub failed_lines: Vec<usize>,
}

/// Orchestrates lesson and word editing.
#[derive(Clone)]
pub struct LessonService {
    lessons: Arc<dyn LessonRepository>,
    words: Arc<dyn WordRepository>,
}

fn map_conflict(name: &str) -> impl FnOnce(StorageError) -> LessonServiceError + '_ {
    move |err| match err {
        StorageError::Conflict => LessonServiceError::DuplicateName(name.to_owned()),
        StorageError::NotFound => LessonServiceError::LessonNotFound,
        other => LessonServiceError::Storage(other),
    }
}

fn word_not_found(err: StorageError) -> LessonServiceError {
    match err {
        StorageError::NotFound => LessonServiceError::WordNotFound,
        other => LessonServiceError::Storage(other),
    }
}

impl LessonService {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonRepository>, words: Arc<dyn WordRepository>) -> Self {
        Self { lessons, words }
    }

    /// Create a lesson with a trimmed, unique name.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Lesson` for a blank name.
    /// Returns `LessonServiceError::DuplicateName` if the name is taken.
    /// Returns `LessonServiceError::Storage` if persistence fails.
    pub async fn create_lesson(&self, name: &str) -> Result<Lesson, LessonServiceError> {
        let name = normalize_lesson_name(name)?;
        if self.lessons.get_lesson_by_name(&name).await?.is_some() {
            return Err(LessonServiceError::DuplicateName(name));
        }
        let lesson = self
            .lessons
            .insert_lesson(&name)
            .await
            .map_err(map_conflict(&name))?;
        tracing::info!(lesson_id = %lesson.id(), name = lesson.name(), "lesson created");
        Ok(lesson)
    }

    /// Rename a lesson. Renaming to its current name does nothing.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::LessonNotFound` if the lesson is missing.
    /// Returns `LessonServiceError::DuplicateName` if another lesson has the name.
    pub async fn rename_lesson(
        &self,
        lesson_id: LessonId,
        name: &str,
    ) -> Result<Lesson, LessonServiceError> {
        let lesson = self
            .lessons
            .get_lesson(lesson_id)
            .await?
            .ok_or(LessonServiceError::LessonNotFound)?;
        let renamed = lesson.renamed(name)?;
        if renamed.name() == lesson.name() {
            return Ok(lesson);
        }

        self.lessons
            .rename_lesson(&renamed)
            .await
            .map_err(map_conflict(renamed.name()))?;
        Ok(renamed)
    }

    /// Delete a lesson along with its words and session records.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::LessonNotFound` if the lesson is missing.
    pub async fn delete_lesson(&self, lesson_id: LessonId) -> Result<(), LessonServiceError> {
        self.lessons
            .delete_lesson(lesson_id)
            .await
            .map_err(|err| match err {
                StorageError::NotFound => LessonServiceError::LessonNotFound,
                other => LessonServiceError::Storage(other),
            })?;
        tracing::info!(%lesson_id, "lesson deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn list_lessons(&self) -> Result<Vec<Lesson>, LessonServiceError> {
        Ok(self.lessons.list_lessons().await?)
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn get_lesson(&self, lesson_id: LessonId) -> Result<Option<Lesson>, LessonServiceError> {
        Ok(self.lessons.get_lesson(lesson_id).await?)
    }

    /// Add word pairs to a lesson as enabled words with zeroed statistics.
    ///
    /// Every pair is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Word` if a side of any pair is blank.
    /// Returns `LessonServiceError::LessonNotFound` if the lesson is missing.
    pub async fn add_word_pairs<S, T>(
        &self,
        lesson_id: LessonId,
        pairs: &[(S, T)],
    ) -> Result<Vec<WordId>, LessonServiceError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let validated = pairs
            .iter()
            .map(|(source, target)| WordPair::new(source, target))
            .collect::<Result<Vec<_>, _>>()?;
        self.insert(lesson_id, &validated).await
    }

    /// Import `source,target` lines into a lesson.
    ///
    /// Lines without a comma or with a blank side are skipped and reported.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Import` if `text` has no lines.
    /// Returns `LessonServiceError::LessonNotFound` if the lesson is missing.
    pub async fn import_word_pairs(
        &self,
        lesson_id: LessonId,
        text: &str,
    ) -> Result<ImportReport, LessonServiceError> {
        let parsed = parse_word_list(text)?;
        let ids = self.insert(lesson_id, &parsed.pairs).await?;
        tracing::info!(
            %lesson_id,
            imported = ids.len(),
            failed = parsed.failed(),
            "word list imported"
        );
        Ok(ImportReport {
            imported: ids.len(),
            failed_lines: parsed.failed_lines,
        })
    }

    /// Flip whether a word takes part in lesson sessions.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::WordNotFound` if the word is missing.
    pub async fn toggle_word_enabled(&self, word_id: WordId) -> Result<bool, LessonServiceError> {
        let word = self
            .words
            .get_word(word_id)
            .await?
            .ok_or(LessonServiceError::WordNotFound)?;
        let enabled = !word.enabled;
        self.words
            .set_word_enabled(word_id, enabled)
            .await
            .map_err(word_not_found)?;
        Ok(enabled)
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::WordNotFound` if the word is missing.
    pub async fn delete_word(&self, word_id: WordId) -> Result<(), LessonServiceError> {
        self.words
            .delete_word(word_id)
            .await
            .map_err(word_not_found)
    }

    /// All words of a lesson, ordered by source term.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn words_for_lesson(
        &self,
        lesson_id: LessonId,
    ) -> Result<Vec<WordEntry>, LessonServiceError> {
        Ok(self.words.list_words_for_lesson(lesson_id).await?)
    }

    async fn insert(
        &self,
        lesson_id: LessonId,
        pairs: &[WordPair],
    ) -> Result<Vec<WordId>, LessonServiceError> {
        if self.lessons.get_lesson(lesson_id).await?.is_none() {
            return Err(LessonServiceError::LessonNotFound);
        }
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        self.words
            .insert_words(lesson_id, pairs)
            .await
            .map_err(|err| match err {
                StorageError::NotFound => LessonServiceError::LessonNotFound,
                other => LessonServiceError::Storage(other),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use vocab_core::model::{LessonError, WordError};

    fn service() -> LessonService {
        let repo = InMemoryRepository::new();
        LessonService::new(Arc::new(repo.clone()), Arc::new(repo))
    }

    #[tokio::test]
    async fn create_trims_and_rejects_duplicates() {
        let svc = service();
        let lesson = svc.create_lesson("  Animals ").await.unwrap();
        assert_eq!(lesson.name(), "Animals");

        let err = svc.create_lesson("Animals").await.unwrap_err();
        assert!(matches!(err, LessonServiceError::DuplicateName(name) if name == "Animals"));

        let err = svc.create_lesson("   ").await.unwrap_err();
        assert!(matches!(err, LessonServiceError::Lesson(LessonError::EmptyName)));
    }

    #[tokio::test]
    async fn rename_to_same_name_is_noop_and_clash_is_rejected() {
        let svc = service();
        let a = svc.create_lesson("Animals").await.unwrap();
        svc.create_lesson("Colors").await.unwrap();

        let same = svc.rename_lesson(a.id(), " Animals ").await.unwrap();
        assert_eq!(same, a);

        let err = svc.rename_lesson(a.id(), "Colors").await.unwrap_err();
        assert!(matches!(err, LessonServiceError::DuplicateName(_)));

        let renamed = svc.rename_lesson(a.id(), "Pets").await.unwrap();
        assert_eq!(renamed.name(), "Pets");

        let err = svc.rename_lesson(LessonId::new(77), "X").await.unwrap_err();
        assert!(matches!(err, LessonServiceError::LessonNotFound));
    }

    #[tokio::test]
    async fn add_word_pairs_validates_everything_first() {
        let svc = service();
        let lesson = svc.create_lesson("Animals").await.unwrap();

        let err = svc
            .add_word_pairs(lesson.id(), &[("hund", "dog"), ("katt", "  ")])
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::Word(WordError::EmptyTargetTerm)));
        assert!(svc.words_for_lesson(lesson.id()).await.unwrap().is_empty());

        let ids = svc
            .add_word_pairs(lesson.id(), &[("hund", "dog")])
            .await
            .unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn import_reports_skipped_lines() {
        let svc = service();
        let lesson = svc.create_lesson("Animals").await.unwrap();

        let report = svc
            .import_word_pairs(lesson.id(), "hund,dog\nbroken\nkatt , cat\n,empty")
            .await
            .unwrap();
        assert_eq!(report.imported, 2);
        assert_eq!(report.failed_lines, vec![2, 4]);

        let words = svc.words_for_lesson(lesson.id()).await.unwrap();
        let terms: Vec<&str> = words.iter().map(|w| w.source_term.as_str()).collect();
        assert_eq!(terms, vec!["hund", "katt"]);
        assert!(words.iter().all(|w| w.enabled && !w.stats.was_presented()));
    }

    #[tokio::test]
    async fn import_into_missing_lesson_fails() {
        let svc = service();
        let err = svc
            .import_word_pairs(LessonId::new(5), "a,b")
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::LessonNotFound));
    }

    #[tokio::test]
    async fn missing_lesson_is_reported_even_without_valid_pairs() {
        let svc = service();
        let err = svc
            .import_word_pairs(LessonId::new(5), "broken\n,empty")
            .await
            .unwrap_err();
        assert!(matches!(err, LessonServiceError::LessonNotFound));

        let none: &[(&str, &str)] = &[];
        let err = svc.add_word_pairs(LessonId::new(5), none).await.unwrap_err();
        assert!(matches!(err, LessonServiceError::LessonNotFound));

        let lesson = svc.create_lesson("Animals").await.unwrap();
        let report = svc.import_word_pairs(lesson.id(), "broken").await.unwrap();
        assert_eq!(report.imported, 0);
        assert_eq!(report.failed_lines, vec![1]);
    }

    #[tokio::test]
    async fn toggle_and_delete_words() {
        let svc = service();
        let lesson = svc.create_lesson("Animals").await.unwrap();
        let ids = svc
            .add_word_pairs(lesson.id(), &[("hund", "dog")])
            .await
            .unwrap();

        assert!(!svc.toggle_word_enabled(ids[0]).await.unwrap());
        assert!(svc.toggle_word_enabled(ids[0]).await.unwrap());

        svc.delete_word(ids[0]).await.unwrap();
        let err = svc.delete_word(ids[0]).await.unwrap_err();
        assert!(matches!(err, LessonServiceError::WordNotFound));
    }
}
