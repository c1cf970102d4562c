//! Decision type shared by the input guard and output validator.

use serde::{Deserialize, Serialize};

/// Outcome of classifying a piece of text.
///
/// The reason is written for logs and operator tooling. Caller-facing
/// messages are chosen by the pipeline stages and are always generic;
/// the reason never travels back to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardDecision {
    blocked: bool,
    reason: String,
}

impl GuardDecision {
    /// Decision that lets the text through.
    pub fn allow() -> Self {
        Self {
            blocked: false,
            reason: String::new(),
        }
    }

    /// Decision that blocks the text for the given reason.
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            blocked: true,
            reason: reason.into(),
        }
    }

    /// Returns true if the text was blocked.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// The reason for a block; empty on an allow.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_decision() {
        let decision = GuardDecision::allow();
        assert!(!decision.is_blocked());
        assert!(decision.reason().is_empty());
    }

    #[test]
    fn test_block_decision() {
        let decision = GuardDecision::block("matched blocked pattern 'instruction_override'");
        assert!(decision.is_blocked());
        assert!(decision.reason().contains("instruction_override"));
    }

    #[test]
    fn test_decision_serialization() {
        let decision = GuardDecision::block("too many instructions: 12 sentence boundaries");
        let json = serde_json::to_string(&decision).unwrap();
        let parsed: GuardDecision = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, decision);
    }
}
