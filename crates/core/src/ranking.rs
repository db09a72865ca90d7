use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{Lesson, LessonId, StoredSessionRecord, WordEntry};

/// Number of words drawn for a worst-words practice session.
pub const WORST_WORDS_LIMIT: usize = 10;

/// Total order used for the worst-words list.
///
/// Most incorrect answers first, then most presented, then source term
/// ascending. The word id breaks any remaining tie.
#[must_use]
pub fn worst_word_order(a: &WordEntry, b: &WordEntry) -> Ordering {
    b.stats
        .times_incorrect
        .cmp(&a.stats.times_incorrect)
        .then_with(|| b.stats.times_presented.cmp(&a.stats.times_presented))
        .then_with(|| a.source_term.cmp(&b.source_term))
        .then_with(|| a.id.cmp(&b.id))
}

/// Picks the `limit` weakest words among those presented at least once.
#[must_use]
pub fn rank_worst_words<I>(words: I, limit: usize) -> Vec<WordEntry>
where
    I: IntoIterator<Item = WordEntry>,
{
    let mut ranked: Vec<WordEntry> = words
        .into_iter()
        .filter(|w| w.stats.was_presented())
        .collect();
    ranked.sort_by(worst_word_order);
    ranked.truncate(limit);
    ranked
}

/// How many recorded sessions a lesson has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    pub lesson_id: LessonId,
    pub lesson_name: String,
    pub completion_count: u32,
}

/// Count sessions per lesson; lessons without sessions report zero.
///
/// Sorted by count descending, then lesson name.
#[must_use]
pub fn lesson_completions(
    lessons: &[Lesson],
    records: &[StoredSessionRecord],
) -> Vec<LessonCompletion> {
    let mut counts: HashMap<LessonId, u32> = HashMap::new();
    for stored in records {
        let entry = counts.entry(stored.record.lesson_id()).or_insert(0);
        *entry = entry.saturating_add(1);
    }

    let mut out: Vec<LessonCompletion> = lessons
        .iter()
        .map(|lesson| LessonCompletion {
            lesson_id: lesson.id(),
            lesson_name: lesson.name().to_owned(),
            completion_count: counts.get(&lesson.id()).copied().unwrap_or(0),
        })
        .collect();
    out.sort_by(|a, b| {
        b.completion_count
            .cmp(&a.completion_count)
            .then_with(|| a.lesson_name.cmp(&b.lesson_name))
    });
    out
}
