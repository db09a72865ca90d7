use std::sync::Arc;

use chrono::Duration;
use services::{AppServices, SessionContext, SessionEngine, SessionStatus};
use storage::repository::{
    InMemoryRepository, SessionRecordRepository, Storage, StorageError, WordRepository,
    WordStatsRepository,
};
use vocab_core::model::{LessonId, StudyMode, WordId};
use vocab_core::time::fixed_clock;

async fn app_with_lesson(pairs: &[(&str, &str)]) -> (InMemoryRepository, AppServices, LessonId) {
    let repo = InMemoryRepository::new();
    let app = AppServices::from_storage(&Storage::from_repository(repo.clone()), fixed_clock());
    let lesson = app.lessons().create_lesson("Animals").await.unwrap();
    app.lessons()
        .add_word_pairs(lesson.id(), pairs)
        .await
        .unwrap();
    (repo, app, lesson.id())
}

async fn answer_all_correctly(engine: &mut SessionEngine) {
    while let Some(word) = engine.state().current_word() {
        let answer = word.target_term.clone();
        engine.clock_mut().advance(Duration::seconds(4));
        engine.check_answer(&answer).await.unwrap();
        engine.advance().await;
    }
}

#[tokio::test]
async fn full_lesson_run_records_one_session() {
    let (repo, app, lesson_id) =
        app_with_lesson(&[("hund", "dog"), ("katt", "cat"), ("häst", "horse")]).await;

    let mut engine = app.start_session(StudyMode::Lesson(lesson_id)).await.unwrap();
    answer_all_correctly(&mut engine).await;

    let snap = engine.snapshot();
    assert!(snap.finished);
    assert_eq!(snap.status, SessionStatus::Finished);
    assert_eq!(snap.message(), "Lesson finished! Great job!");
    assert_eq!(snap.summary.total_words, 3);
    assert_eq!(snap.summary.answered, 3);
    assert_eq!(snap.summary.correct, 3);
    assert_eq!(snap.summary.incorrect, 0);
    assert!(snap.current_source_term.is_none());

    let records = repo.list_session_records().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record.correct_answers(), 3);
    assert_eq!(records[0].record.total_words(), 3);
    assert_eq!(records[0].record.duration(), Duration::seconds(12));

    for word in repo.list_words_for_lesson(lesson_id).await.unwrap() {
        assert_eq!(word.stats.times_presented, 1);
        assert_eq!(word.stats.times_correct, 1);
    }
}

#[tokio::test]
async fn empty_lesson_finishes_without_record() {
    let (repo, app, _) = app_with_lesson(&[]).await;
    let empty = app.lessons().create_lesson("Empty").await.unwrap();

    let mut engine = app.start_session(StudyMode::Lesson(empty.id())).await.unwrap();
    let snap = engine.snapshot();
    assert!(snap.finished);
    assert!(snap.answer_checked);
    assert_eq!(snap.summary.total_words, 0);
    assert_eq!(snap.message(), "This lesson has no enabled words to study.");

    assert!(engine.check_answer("anything").await.is_none());
    engine.advance().await;
    assert!(repo.list_session_records().await.unwrap().is_empty());
}

#[tokio::test]
async fn restart_resets_counters_and_allows_a_second_record() {
    let (repo, app, lesson_id) = app_with_lesson(&[("hund", "dog"), ("katt", "cat")]).await;

    let mut engine = app.start_session(StudyMode::Lesson(lesson_id)).await.unwrap();
    answer_all_correctly(&mut engine).await;
    assert!(engine.state().is_stats_saved());

    engine.restart().await.unwrap();
    let snap = engine.snapshot();
    assert!(!snap.finished);
    assert_eq!(snap.summary.answered, 0);
    assert_eq!(snap.summary.correct, 0);
    assert!(!engine.state().is_stats_saved());

    answer_all_correctly(&mut engine).await;
    assert_eq!(repo.list_session_records().await.unwrap().len(), 2);

    // presentation counts compound across runs
    for word in repo.list_words_for_lesson(lesson_id).await.unwrap() {
        assert_eq!(word.stats.times_presented, 2);
    }
}

#[tokio::test]
async fn practice_sessions_never_record() {
    let (repo, app, lesson_id) = app_with_lesson(&[("hund", "dog"), ("katt", "cat")]).await;

    let mut lesson_run = app.start_session(StudyMode::Lesson(lesson_id)).await.unwrap();
    while let Some(word) = lesson_run.state().current_word() {
        let wrong = format!("{}x", word.target_term);
        lesson_run.clock_mut().advance(Duration::seconds(1));
        lesson_run.check_answer(&wrong).await.unwrap();
        lesson_run.advance().await;
    }
    assert_eq!(repo.list_session_records().await.unwrap().len(), 1);

    let mut practice = app.start_session(StudyMode::WorstWordsPractice).await.unwrap();
    assert_eq!(practice.snapshot().title(), "Practicing Worst Words");
    assert_eq!(practice.snapshot().summary.total_words, 2);
    answer_all_correctly(&mut practice).await;

    assert!(practice.snapshot().finished);
    assert_eq!(practice.snapshot().message(), "Practice finished! Great job!");
    assert!(practice.snapshot().summary_text().starts_with("Total words in practice: 2"));
    assert_eq!(repo.list_session_records().await.unwrap().len(), 1);
}

#[tokio::test]
async fn practice_without_history_is_empty() {
    let (_repo, app, _) = app_with_lesson(&[("hund", "dog")]).await;
    let engine = app.start_session(StudyMode::WorstWordsPractice).await.unwrap();
    let snap = engine.snapshot();
    assert!(snap.finished);
    assert_eq!(
        snap.message(),
        "No words to practice yet, or all words are well known!"
    );
}

#[tokio::test]
async fn clearing_statistics_empties_worst_words() {
    let (repo, app, lesson_id) = app_with_lesson(&[("hund", "dog")]).await;
    let mut engine = app.start_session(StudyMode::Lesson(lesson_id)).await.unwrap();
    engine.check_answer("cat").await.unwrap();

    let stats = app.statistics();
    assert_eq!(stats.worst_words(10).await.unwrap().len(), 1);

    stats.clear_all_statistics().await.unwrap();

    assert!(stats.worst_words(10).await.unwrap().is_empty());
    for word in repo.list_words_for_lesson(lesson_id).await.unwrap() {
        assert_eq!(word.stats.times_presented, 0);
        assert_eq!(word.stats.times_incorrect, 0);
    }
}

#[tokio::test]
async fn deleting_a_lesson_removes_its_history() {
    let (repo, app, lesson_id) = app_with_lesson(&[("hund", "dog")]).await;
    let mut engine = app.start_session(StudyMode::Lesson(lesson_id)).await.unwrap();
    answer_all_correctly(&mut engine).await;
    assert_eq!(repo.list_session_records().await.unwrap().len(), 1);

    app.lessons().delete_lesson(lesson_id).await.unwrap();

    assert!(repo.list_session_records().await.unwrap().is_empty());
    let overview = app.statistics().overview().await.unwrap();
    assert!(overview.worst_words.is_empty());
    assert_eq!(overview.total_study_time_text, "0 seconds");
}

//
// ─── FAILING STATS BACKEND ─────────────────────────────────────────────────────
//

struct BrokenStats;

#[async_trait::async_trait]
impl WordStatsRepository for BrokenStats {
    async fn increment_presented(&self, _id: WordId) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn increment_correct(&self, _id: WordId) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn increment_incorrect(&self, _id: WordId) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn reset_all_word_stats(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn stat_failures_do_not_interrupt_the_session() {
    let (repo, _app, lesson_id) = app_with_lesson(&[("hund", "dog"), ("katt", "cat")]).await;
    let ctx = SessionContext::new(
        fixed_clock(),
        Arc::new(repo.clone()) as Arc<dyn WordRepository>,
        Arc::new(BrokenStats),
        Arc::new(repo.clone()) as Arc<dyn SessionRecordRepository>,
    );

    let mut engine = SessionEngine::start(ctx, StudyMode::Lesson(lesson_id))
        .await
        .unwrap();
    answer_all_correctly(&mut engine).await;

    assert_eq!(engine.snapshot().summary.correct, 2);
    assert_eq!(repo.list_session_records().await.unwrap().len(), 1);
    for word in repo.list_words_for_lesson(lesson_id).await.unwrap() {
        assert!(!word.stats.was_presented());
    }
}
