//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use vocab_core::import::ImportError;
use vocab_core::model::{LessonError, WordError};

/// Errors emitted by `LessonService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonServiceError {
    #[error("a lesson named {0:?} already exists")]
    DuplicateName(String),
    #[error("lesson not found")]
    LessonNotFound,
    #[error("word not found")]
    WordNotFound,
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by session services.
///
/// Only loading the word list can fail; answer checks and stat writes never
/// surface errors to the caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `RankingEngine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `PreferencesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferencesError {
    #[error("lesson not found")]
    LessonNotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
