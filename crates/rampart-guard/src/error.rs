//! Error types for the pattern guard.

use thiserror::Error;

/// Result type alias for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors raised while building or extending pattern sets.
///
/// # Security Notes
///
/// Callers must treat any variant as a refusal to vouch for the rules,
/// never as "no rules loaded". A pattern that fails to compile leaves the
/// configured rule set incomplete, and running with an incomplete rule
/// set is a silent hole in the perimeter.
#[derive(Debug, Error)]
pub enum GuardError {
    /// A pattern failed to compile.
    #[error("invalid pattern '{name}': {source}")]
    InvalidPattern {
        /// Name the pattern was registered under.
        name: String,
        /// Underlying compile error.
        #[source]
        source: regex::Error,
    },

    /// A pattern name collides with one already loaded.
    ///
    /// Names appear in decision reasons and fingerprints, so they must
    /// be unique across the blocked and suspicious lists combined.
    #[error("duplicate pattern name '{0}'")]
    DuplicateName(String),
}
