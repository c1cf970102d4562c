//! Error types for the guard pipeline.

use thiserror::Error;

use rampart_guard::GuardError;
use rampart_tracker::TrackerError;

/// Errors surfaced by the pipeline facade.
///
/// These are operational failures, not security verdicts. A blocked
/// request is a [`StageOutcome::Reject`](crate::StageOutcome), not an
/// error. Callers that do hit an error must still refuse the request.
#[derive(Debug, Error)]
pub enum RampartError {
    /// A configured pattern failed to compile or collided on name.
    #[error("pattern error: {0}")]
    Pattern(#[from] GuardError),

    /// The attack tracker could not read or write its ledger.
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Configuration could not be loaded or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// Internal pipeline failure.
    #[error("internal error: {0}")]
    Internal(String),
}
