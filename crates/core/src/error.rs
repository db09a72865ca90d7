use thiserror::Error;

use crate::import::ImportError;
use crate::model::{LessonError, SessionRecordError, WordError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    SessionRecord(#[from] SessionRecordError),
    #[error(transparent)]
    Import(#[from] ImportError),
}
