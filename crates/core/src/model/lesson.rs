use thiserror::Error;

use crate::model::ids::LessonId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson name cannot be empty")]
    EmptyName,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A named group of word pairs.
///
/// Names are stored trimmed; uniqueness is enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    name: String,
}

impl Lesson {
    /// Creates a lesson after normalizing its name.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyName` if the name is blank.
    pub fn new(id: LessonId, name: impl Into<String>) -> Result<Self, LessonError> {
        let name = normalize_lesson_name(&name.into())?;
        Ok(Self { id, name })
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the lesson under a new name.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyName` if the name is blank.
    pub fn renamed(&self, name: impl Into<String>) -> Result<Self, LessonError> {
        Self::new(self.id, name)
    }
}

/// Trims a lesson name and rejects blank input.
///
/// # Errors
///
/// Returns `LessonError::EmptyName` if nothing is left after trimming.
pub fn normalize_lesson_name(raw: &str) -> Result<String, LessonError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LessonError::EmptyName);
    }
    Ok(trimmed.to_owned())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let err = Lesson::new(LessonId::new(1), "   ").unwrap_err();
        assert_eq!(err, LessonError::EmptyName);
    }

    #[test]
    fn name_is_trimmed() {
        let lesson = Lesson::new(LessonId::new(1), "  Animals \n").unwrap();
        assert_eq!(lesson.name(), "Animals");
    }

    #[test]
    fn rename_keeps_id() {
        let lesson = Lesson::new(LessonId::new(4), "Food").unwrap();
        let renamed = lesson.renamed("Drinks").unwrap();
        assert_eq!(renamed.id(), LessonId::new(4));
        assert_eq!(renamed.name(), "Drinks");
    }
}
