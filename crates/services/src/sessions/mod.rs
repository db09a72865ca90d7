mod engine;
mod queries;
mod recorder;
mod snapshot;
mod state;
mod tracker;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{SessionContext, SessionEngine};
pub use recorder::SessionStatsRecorder;
pub use snapshot::SessionSnapshot;
pub use state::{Advance, AnswerFeedback, SessionState, SessionStatus, SessionSummary};
pub use tracker::WordStatsTracker;
