#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_service;
pub mod preferences_service;
pub mod ranking_service;
pub mod sessions;

pub use vocab_core::Clock;
pub use sessions as session;

pub use app_services::AppServices;
pub use error::{
    AppServicesError, LessonServiceError, PreferencesError, SessionError, StatisticsError,
};
pub use lesson_service::{ImportReport, LessonService};
pub use preferences_service::PreferencesService;
pub use ranking_service::{RankingEngine, StatisticsOverview};

pub use sessions::{
    AnswerFeedback, SessionContext, SessionEngine, SessionSnapshot, SessionState, SessionStatus,
    SessionStatsRecorder, SessionSummary, WordStatsTracker,
};
