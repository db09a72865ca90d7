use rand::rng;
use rand::seq::SliceRandom;

use storage::repository::{StorageError, WordRepository};
use vocab_core::model::{StudyMode, WordEntry};
use vocab_core::ranking::{WORST_WORDS_LIMIT, rank_worst_words};

/// Load the words a session of `mode` studies, in study order.
///
/// Lesson words are reshuffled on every call.
///
/// # Errors
///
/// Returns `StorageError` when repository access fails.
pub(crate) async fn load_session_words(
    mode: StudyMode,
    words: &dyn WordRepository,
) -> Result<Vec<WordEntry>, StorageError> {
    match mode {
        StudyMode::Lesson(lesson_id) => {
            let mut list = words.enabled_words_for_lesson(lesson_id).await?;
            let mut rng = rng();
            list.as_mut_slice().shuffle(&mut rng);
            Ok(list)
        }
        StudyMode::WorstWordsPractice => {
            let limit = u32::try_from(WORST_WORDS_LIMIT).unwrap_or(u32::MAX);
            let candidates = words.worst_word_candidates(limit).await?;
            Ok(rank_worst_words(candidates, WORST_WORDS_LIMIT))
        }
    }
}
