//! Input guard stage.
//!
//! Runs after session isolation. Hands the task text to the attack
//! tracker, which classifies it and records blocked attempts against the
//! user. A block produces one structured warning with the full detail
//! and a generic rejection for the caller.
//!
//! Tracker errors reject the request. An input the guard could not
//! screen is an input the agent does not see.

use std::sync::Arc;

use tracing::warn;

use rampart_tracker::{truncate_snippet, AttackTracker};

use crate::context::RequestContext;
use crate::stage::{FailureCode, StageOutcome, MSG_INPUT_BLOCKED, MSG_INTERNAL};

/// Screens task text through the attack tracker.
#[derive(Debug, Clone)]
pub struct InputGuardStage {
    tracker: Arc<AttackTracker>,
}

impl InputGuardStage {
    /// Stage backed by `tracker`.
    #[must_use]
    pub fn new(tracker: Arc<AttackTracker>) -> Self {
        Self { tracker }
    }

    /// Screens `context`, recording the attempt if it is blocked.
    pub fn process(&self, context: &RequestContext) -> StageOutcome {
        match self
            .tracker
            .check_user(&context.user_id, &context.current_task)
        {
            Ok(decision) if decision.is_blocked() => {
                warn!(
                    event = "injection_blocked",
                    user = %context.user_id,
                    agent = %context.agent_id,
                    reason = %decision.reason(),
                    snippet = %truncate_snippet(&context.current_task),
                    "input blocked"
                );
                StageOutcome::reject(FailureCode::SecurityBlock, MSG_INPUT_BLOCKED)
            }
            Ok(_) => StageOutcome::proceed(context.clone()),
            Err(error) => {
                warn!(
                    user = %context.user_id,
                    error = %error,
                    "input guard unavailable, rejecting"
                );
                StageOutcome::reject(FailureCode::Internal, MSG_INTERNAL)
            }
        }
    }

    /// The tracker behind this stage.
    #[must_use]
    pub fn tracker(&self) -> &AttackTracker {
        &self.tracker
    }
}
