//! Error types for the attack tracker.

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors raised by the ledger and tracker.
///
/// # Security Notes
///
/// Callers must treat any variant as a refusal to vouch for the input,
/// never as a pass. The pipeline maps these to a generic internal
/// rejection.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A ledger lock was poisoned by a panicking writer.
    ///
    /// The history behind the lock can no longer be trusted to be
    /// complete, so threshold accounting is unreliable from here on.
    #[error("attack ledger lock poisoned")]
    LedgerPoisoned,
}
