use chrono::{DateTime, Utc};
use serde::Serialize;
use vocab_core::matcher::{is_match, per_character_correctness};
use vocab_core::model::{StudyMode, WordEntry, WordId};

//
// ─── FEEDBACK & SUMMARY ────────────────────────────────────────────────────────
//

/// Outcome of checking one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub word_id: WordId,
    pub is_correct: bool,
    pub user_answer: String,
    /// One flag per character of `user_answer`. Empty for correct answers.
    pub character_mask: Vec<bool>,
    /// The expected answer, only present when the user got it wrong.
    pub correct_answer: Option<String>,
}

/// Running counters of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub total_words: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl SessionSummary {
    /// Multi-line text shown at the end of a session.
    #[must_use]
    pub fn text(&self, mode: StudyMode) -> String {
        let title = if mode.is_practice() {
            "Total words in practice:"
        } else {
            "Total words in lesson:"
        };
        format!(
            "{title} {}\nAnswered: {}\nCorrect: {}\nIncorrect: {}",
            self.total_words, self.answered, self.correct, self.incorrect
        )
    }
}

/// Coarse state a presentation layer can turn into a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    /// The selection had nothing to study.
    NoWords,
    AwaitingAnswer,
    Correct,
    Incorrect { correct_answer: String },
    Finished,
}

impl SessionStatus {
    #[must_use]
    pub fn message(&self, mode: StudyMode) -> &'static str {
        match (self, mode.is_practice()) {
            (SessionStatus::NoWords, false) => "This lesson has no enabled words to study.",
            (SessionStatus::NoWords, true) => {
                "No words to practice yet, or all words are well known!"
            }
            (SessionStatus::AwaitingAnswer, _) => "",
            (SessionStatus::Correct, _) => "Correct!",
            (SessionStatus::Incorrect { .. }, _) => "Incorrect.",
            (SessionStatus::Finished, false) => "Lesson finished! Great job!",
            (SessionStatus::Finished, true) => "Practice finished! Great job!",
        }
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    At(usize),
    PastEnd,
}

/// What a call to [`SessionState::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A new word is on screen and counts as presented.
    Presented(WordId),
    /// The last word was left behind; the session just finished.
    Finished,
    /// The session was already over.
    Ignored,
}

/// In-memory state of one study run.
///
/// The cursor only moves forward. A restart builds a new state.
#[derive(Debug, Clone)]
pub struct SessionState {
    mode: StudyMode,
    words: Vec<WordEntry>,
    cursor: Cursor,
    correct: u32,
    incorrect: u32,
    answer_checked: bool,
    finished: bool,
    stats_saved: bool,
    started_at: DateTime<Utc>,
    feedback: Option<AnswerFeedback>,
}

impl SessionState {
    /// Build a state positioned before the first word.
    ///
    /// An empty word list yields a state that is already finished.
    #[must_use]
    pub fn new(mode: StudyMode, words: Vec<WordEntry>, started_at: DateTime<Utc>) -> Self {
        let empty = words.is_empty();
        Self {
            mode,
            words,
            cursor: if empty {
                Cursor::PastEnd
            } else {
                Cursor::BeforeFirst
            },
            correct: 0,
            incorrect: 0,
            answer_checked: empty,
            finished: empty,
            stats_saved: false,
            started_at,
            feedback: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> StudyMode {
        self.mode
    }

    #[must_use]
    pub fn words(&self) -> &[WordEntry] {
        &self.words
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_answer_checked(&self) -> bool {
        self.answer_checked
    }

    #[must_use]
    pub fn is_stats_saved(&self) -> bool {
        self.stats_saved
    }

    pub(crate) fn mark_stats_saved(&mut self) {
        self.stats_saved = true;
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        self.feedback.as_ref()
    }

    #[must_use]
    pub fn current_word(&self) -> Option<&WordEntry> {
        match self.cursor {
            Cursor::At(idx) => self.words.get(idx),
            Cursor::BeforeFirst | Cursor::PastEnd => None,
        }
    }

    #[must_use]
    pub fn total_words(&self) -> u32 {
        u32::try_from(self.words.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_words: self.total_words(),
            answered: self.correct.saturating_add(self.incorrect),
            correct: self.correct,
            incorrect: self.incorrect,
        }
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.finished {
            return if self.words.is_empty() {
                SessionStatus::NoWords
            } else {
                SessionStatus::Finished
            };
        }
        match &self.feedback {
            None => SessionStatus::AwaitingAnswer,
            Some(fb) if fb.is_correct => SessionStatus::Correct,
            Some(fb) => SessionStatus::Incorrect {
                correct_answer: fb.correct_answer.clone().unwrap_or_default(),
            },
        }
    }

    /// Move to the next word, finishing the session after the last one.
    pub fn advance(&mut self) -> Advance {
        let next = match self.cursor {
            Cursor::PastEnd => return Advance::Ignored,
            Cursor::BeforeFirst => 0,
            Cursor::At(idx) => idx + 1,
        };

        self.feedback = None;
        if let Some(word) = self.words.get(next) {
            self.cursor = Cursor::At(next);
            self.answer_checked = false;
            return Advance::Presented(word.id);
        }

        self.cursor = Cursor::PastEnd;
        self.answer_checked = true;
        self.finished = true;
        Advance::Finished
    }

    /// Check `user_answer` against the current word.
    ///
    /// Returns `None` when no word is shown or the word was already checked.
    pub fn check_answer(&mut self, user_answer: &str) -> Option<AnswerFeedback> {
        if self.answer_checked {
            return None;
        }
        let (word_id, expected) = {
            let word = self.current_word()?;
            (word.id, word.target_term.clone())
        };

        let feedback = if is_match(user_answer, &expected) {
            self.correct = self.correct.saturating_add(1);
            AnswerFeedback {
                word_id,
                is_correct: true,
                user_answer: user_answer.to_owned(),
                character_mask: Vec::new(),
                correct_answer: None,
            }
        } else {
            self.incorrect = self.incorrect.saturating_add(1);
            AnswerFeedback {
                word_id,
                is_correct: false,
                user_answer: user_answer.to_owned(),
                character_mask: per_character_correctness(user_answer, &expected),
                correct_answer: Some(expected),
            }
        };

        self.answer_checked = true;
        self.feedback = Some(feedback.clone());
        Some(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::{LessonId, WordPair};
    use vocab_core::time::fixed_now;

    fn words(raw: &[(&str, &str)]) -> Vec<WordEntry> {
        raw.iter()
            .enumerate()
            .map(|(i, (s, t))| {
                WordPair::new(s, t)
                    .unwrap()
                    .assign_id(WordId::new(i as u64 + 1), LessonId::new(1))
            })
            .collect()
    }

    fn lesson_state(raw: &[(&str, &str)]) -> SessionState {
        SessionState::new(StudyMode::Lesson(LessonId::new(1)), words(raw), fixed_now())
    }

    #[test]
    fn empty_state_is_finished_from_the_start() {
        let mut state = lesson_state(&[]);
        assert!(state.is_finished());
        assert!(state.is_answer_checked());
        assert_eq!(state.status(), SessionStatus::NoWords);
        assert_eq!(state.advance(), Advance::Ignored);
        assert_eq!(state.summary(), SessionSummary::default());
    }

    #[test]
    fn walks_words_in_order_then_finishes() {
        let mut state = lesson_state(&[("hund", "dog"), ("katt", "cat")]);
        assert!(state.current_word().is_none());

        assert_eq!(state.advance(), Advance::Presented(WordId::new(1)));
        assert_eq!(state.current_word().unwrap().source_term, "hund");
        assert_eq!(state.advance(), Advance::Presented(WordId::new(2)));
        assert_eq!(state.advance(), Advance::Finished);
        assert!(state.current_word().is_none());
        assert_eq!(state.status(), SessionStatus::Finished);
        assert_eq!(state.advance(), Advance::Ignored);
    }

    #[test]
    fn checking_twice_is_ignored() {
        let mut state = lesson_state(&[("hund", "dog")]);
        state.advance();

        let first = state.check_answer("Dog").unwrap();
        assert!(first.is_correct);
        assert!(state.check_answer("dog").is_none());
        assert_eq!(state.summary().correct, 1);
        assert_eq!(state.status(), SessionStatus::Correct);
    }

    #[test]
    fn check_before_first_word_is_ignored() {
        let mut state = lesson_state(&[("hund", "dog")]);
        assert!(state.check_answer("dog").is_none());
    }

    #[test]
    fn wrong_answer_carries_mask_and_expected_text() {
        let mut state = lesson_state(&[("katt", "cat")]);
        state.advance();

        let fb = state.check_answer("Cut").unwrap();
        assert!(!fb.is_correct);
        assert_eq!(fb.character_mask, vec![true, false, true]);
        assert_eq!(fb.correct_answer.as_deref(), Some("cat"));
        assert_eq!(
            state.status(),
            SessionStatus::Incorrect {
                correct_answer: "cat".into()
            }
        );
    }

    #[test]
    fn advancing_clears_feedback() {
        let mut state = lesson_state(&[("a", "x"), ("b", "y")]);
        state.advance();
        state.check_answer("z");
        state.advance();
        assert!(state.feedback().is_none());
        assert!(!state.is_answer_checked());
        assert_eq!(state.status(), SessionStatus::AwaitingAnswer);
    }

    #[test]
    fn skipped_words_stay_unanswered() {
        let mut state = lesson_state(&[("a", "x"), ("b", "y")]);
        state.advance();
        state.advance();
        state.check_answer("y");
        state.advance();

        let summary = state.summary();
        assert_eq!(summary.total_words, 2);
        assert_eq!(summary.answered, 1);
    }

    #[test]
    fn summary_text_depends_on_mode() {
        let summary = SessionSummary {
            total_words: 3,
            answered: 2,
            correct: 1,
            incorrect: 1,
        };
        assert_eq!(
            summary.text(StudyMode::Lesson(LessonId::new(1))),
            "Total words in lesson: 3\nAnswered: 2\nCorrect: 1\nIncorrect: 1"
        );
        assert!(
            summary
                .text(StudyMode::WorstWordsPractice)
                .starts_with("Total words in practice: 3")
        );
    }

    #[test]
    fn status_messages() {
        let lesson = StudyMode::Lesson(LessonId::new(1));
        let practice = StudyMode::WorstWordsPractice;
        assert_eq!(
            SessionStatus::Finished.message(lesson),
            "Lesson finished! Great job!"
        );
        assert_eq!(
            SessionStatus::Finished.message(practice),
            "Practice finished! Great job!"
        );
        assert_eq!(
            SessionStatus::NoWords.message(practice),
            "No words to practice yet, or all words are well known!"
        );
        assert_eq!(SessionStatus::Correct.message(lesson), "Correct!");
    }
}
