use serde::Serialize;
use vocab_core::model::StudyMode;

use super::state::{AnswerFeedback, SessionState, SessionStatus, SessionSummary};

/// Read-only view of a session for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub mode: StudyMode,
    pub current_source_term: Option<String>,
    pub status: SessionStatus,
    pub feedback: Option<AnswerFeedback>,
    pub summary: SessionSummary,
    pub answer_checked: bool,
    pub finished: bool,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            mode: state.mode(),
            current_source_term: state.current_word().map(|w| w.source_term.clone()),
            status: state.status(),
            feedback: state.feedback().cloned(),
            summary: state.summary(),
            answer_checked: state.is_answer_checked(),
            finished: state.is_finished(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.mode.title()
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.status.message(self.mode)
    }

    #[must_use]
    pub fn summary_text(&self) -> String {
        self.summary.text(self.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::{LessonId, WordId, WordPair};
    use vocab_core::time::fixed_now;

    #[test]
    fn reflects_current_word_and_message() {
        let word = WordPair::new("hund", "dog")
            .unwrap()
            .assign_id(WordId::new(1), LessonId::new(4));
        let mut state = SessionState::new(StudyMode::Lesson(LessonId::new(4)), vec![word], fixed_now());
        state.advance();
        state.check_answer("Dig");

        let snap = SessionSnapshot::from_state(&state);
        assert_eq!(snap.current_source_term.as_deref(), Some("hund"));
        assert_eq!(snap.message(), "Incorrect.");
        assert_eq!(snap.title(), "Studying Lesson");
        assert!(snap.answer_checked);
        assert!(!snap.finished);
        assert_eq!(
            snap.status,
            SessionStatus::Incorrect {
                correct_answer: "dog".into()
            }
        );

        let feedback = snap.feedback.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.user_answer, "Dig");
        assert_eq!(feedback.character_mask, vec![true, false, true]);
        assert_eq!(feedback.correct_answer.as_deref(), Some("dog"));
    }

    #[test]
    fn serializes_for_presentation() {
        let state = SessionState::new(StudyMode::WorstWordsPractice, Vec::new(), fixed_now());
        let snap = SessionSnapshot::from_state(&state);

        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["finished"], true);
        assert_eq!(json["status"], "NoWords");
        assert_eq!(json["summary"]["total_words"], 0);
    }
}
