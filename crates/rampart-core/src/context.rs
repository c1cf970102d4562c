//! The request context carried through the pipeline.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One agent request as seen by the guard stages.
///
/// Everything here except `agent_id` is caller-supplied and untrusted.
/// Stages read the context and may emit a sanitized copy; they never
/// mutate the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Agent the request is addressed to.
    pub agent_id: String,

    /// Claimed identity of the requesting user.
    pub user_id: String,

    /// Claimed session identifier.
    pub session_id: String,

    /// The task text the user wants the agent to perform.
    pub current_task: String,

    /// Free-form metadata attached by the caller. Untrusted; the
    /// isolation stage drops everything its policy does not admit.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl RequestContext {
    /// Builds a context with empty metadata.
    pub fn new(
        agent_id: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        current_task: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            current_task: current_task.into(),
            metadata: HashMap::new(),
        }
    }

    /// Attaches a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_construction() {
        let context = RequestContext::new("agent-1", "user-1", "session-12345678", "do the thing")
            .with_metadata("locale", serde_json::json!("en-US"));
        assert_eq!(context.agent_id, "agent-1");
        assert_eq!(context.metadata.len(), 1);
    }

    #[test]
    fn test_context_json_round_trip() {
        let context = RequestContext::new("agent-1", "user-1", "session-12345678", "task")
            .with_metadata("source", serde_json::json!("web"));
        let json = serde_json::to_string(&context).unwrap();
        let parsed: RequestContext = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, context);
    }

    #[test]
    fn test_metadata_defaults_empty_when_absent() {
        let json = r#"{
            "agent_id": "agent-1",
            "user_id": "user-1",
            "session_id": "session-12345678",
            "current_task": "task"
        }"#;
        let parsed: RequestContext = serde_json::from_str(json).unwrap();
        assert!(parsed.metadata.is_empty());
    }
}
