//! Stage outcomes and the failure vocabulary.
//!
//! Every stage resolves to a [`StageOutcome`]: either the request
//! proceeds with a (possibly sanitized) context, or it is rejected with
//! a [`StageFailure`]. A rejection ends the stage chain; later stages
//! never see the request.
//!
//! ## Security Notes
//!
//! Failure messages cross the trust boundary back to the caller, so the
//! constants below are deliberately generic. Naming the matched pattern
//! or the session rule that failed would teach an attacker which probe
//! landed. The specifics go to the structured log instead.

use crate::context::RequestContext;

/// Caller-facing message for identity and session failures.
pub const MSG_INVALID_SESSION: &str = "invalid session";

/// Caller-facing message for guard blocks.
pub const MSG_INPUT_BLOCKED: &str = "input blocked due to security concerns";

/// Caller-facing message for internal failures.
pub const MSG_INTERNAL: &str = "request could not be processed";

/// Machine-readable failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCode {
    /// Identity or session validation failed.
    InvalidSession,
    /// The input guard blocked the request.
    SecurityBlock,
    /// The pipeline itself failed; the request is refused, not retried.
    Internal,
}

impl std::fmt::Display for FailureCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InvalidSession => "invalid_session",
            Self::SecurityBlock => "security_block",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Why a stage refused the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    /// Failure class, for callers that branch on outcome.
    pub code: FailureCode,
    /// Generic message safe to return to the caller.
    pub message: String,
}

/// Result of running a stage (or the whole chain).
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// The request may continue with this context.
    Proceed {
        /// Context to hand to the next stage or the agent. May differ
        /// from the input when a stage sanitized it.
        context: RequestContext,
    },
    /// The request is refused.
    Reject {
        /// Failure class and caller-safe message.
        failure: StageFailure,
    },
}

impl StageOutcome {
    /// Outcome that lets the request continue with `context`.
    #[must_use]
    pub fn proceed(context: RequestContext) -> Self {
        Self::Proceed { context }
    }

    /// Outcome that refuses the request.
    #[must_use]
    pub fn reject(code: FailureCode, message: impl Into<String>) -> Self {
        Self::Reject {
            failure: StageFailure {
                code,
                message: message.into(),
            },
        }
    }

    /// True when the request may continue.
    #[inline]
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed { .. })
    }

    /// True when the request was refused.
    #[inline]
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Reject { .. })
    }

    /// The sanitized context, when the request proceeded.
    #[must_use]
    pub fn context(&self) -> Option<&RequestContext> {
        match self {
            Self::Proceed { context } => Some(context),
            Self::Reject { .. } => None,
        }
    }

    /// The failure, when the request was refused.
    #[must_use]
    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            Self::Proceed { .. } => None,
            Self::Reject { failure } => Some(failure),
        }
    }
}
