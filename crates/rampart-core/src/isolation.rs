//! Session isolation stage.
//!
//! First stage in the chain. Rejects requests whose claimed identity is
//! malformed and scrubs caller metadata down to an allow-list before any
//! later stage reads the context.
//!
//! ## Security Notes
//!
//! Both identity failures return the same generic message. Telling a
//! caller whether the user id or the session id was at fault helps them
//! enumerate valid sessions.

use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::stage::{FailureCode, StageOutcome, MSG_INVALID_SESSION};

/// Default minimum length for a session identifier, in characters.
pub const DEFAULT_MIN_SESSION_ID_LEN: usize = 8;

/// Default maximum length for an admitted metadata string value.
pub const DEFAULT_MAX_METADATA_VALUE_LEN: usize = 256;

/// Allow-list policy for caller metadata.
///
/// Only JSON string values within the length cap survive. Objects,
/// arrays, numbers, and booleans are dropped wholesale: nested values
/// are a classic place to smuggle instructions past input screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataPolicy {
    max_value_len: usize,
}

impl MetadataPolicy {
    /// Policy with the default length cap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_value_len: DEFAULT_MAX_METADATA_VALUE_LEN,
        }
    }

    /// Overrides the maximum admitted string length.
    #[must_use]
    pub const fn with_max_value_len(mut self, max_value_len: usize) -> Self {
        self.max_value_len = max_value_len;
        self
    }

    /// True when the policy admits `value`.
    #[must_use]
    pub fn admits(&self, value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::String(text) => text.chars().count() <= self.max_value_len,
            _ => false,
        }
    }
}

impl Default for MetadataPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates claimed identity and scrubs metadata.
#[derive(Debug, Clone)]
pub struct SessionIsolationStage {
    min_session_id_len: usize,
    policy: MetadataPolicy,
}

impl SessionIsolationStage {
    /// Stage with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_session_id_len: DEFAULT_MIN_SESSION_ID_LEN,
            policy: MetadataPolicy::new(),
        }
    }

    /// Overrides the minimum session identifier length.
    #[must_use]
    pub fn with_min_session_id_len(mut self, min_len: usize) -> Self {
        self.min_session_id_len = min_len;
        self
    }

    /// Overrides the metadata policy.
    #[must_use]
    pub fn with_policy(mut self, policy: MetadataPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Validates `context`, returning a sanitized copy on success.
    ///
    /// The input context is never mutated. On success the returned copy
    /// carries only the metadata entries the policy admits.
    pub fn validate(&self, context: &RequestContext) -> StageOutcome {
        if context.user_id.is_empty() {
            warn!(
                agent = %context.agent_id,
                session = %context.session_id,
                "request with empty user id rejected"
            );
            return StageOutcome::reject(FailureCode::InvalidSession, MSG_INVALID_SESSION);
        }

        if context.session_id.chars().count() < self.min_session_id_len {
            warn!(
                agent = %context.agent_id,
                user = %context.user_id,
                "request with short session id rejected"
            );
            return StageOutcome::reject(FailureCode::InvalidSession, MSG_INVALID_SESSION);
        }

        let mut sanitized = context.clone();
        sanitized.metadata.retain(|key, value| {
            let admitted = self.policy.admits(value);
            if !admitted {
                debug!(key = %key, "metadata entry dropped by policy");
            }
            admitted
        });
        StageOutcome::proceed(sanitized)
    }
}

impl Default for SessionIsolationStage {
    fn default() -> Self {
        Self::new()
    }
}
