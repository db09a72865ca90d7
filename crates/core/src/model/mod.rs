mod ids;
mod lesson;
mod session;
mod word;

pub use ids::{LessonId, ParseIdError, WordId};

pub use lesson::{Lesson, LessonError, normalize_lesson_name};
pub use session::{SessionRecord, SessionRecordError, StoredSessionRecord, StudyMode};
pub use word::{WordEntry, WordError, WordPair, WordStats};
