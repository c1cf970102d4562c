//! # Rampart Core
//!
//! Unified guard pipeline for agent request screening.
//! Orchestrates session isolation, the pattern guard, attack tracking,
//! and output leak validation behind one facade.
//!
//! ## Threat Coverage
//!
//! Rampart screens both directions of an agent conversation:
//!
//! | Direction | Component | Threats Handled |
//! |-----------|-----------|-----------------|
//! | Inbound | Session Isolation | Session spoofing, metadata smuggling |
//! | Inbound | Input Guard | Prompt injection, jailbreaks, instruction floods |
//! | Cross-request | Attack Tracker | Repeat offenders, slow campaigns |
//! | Outbound | Output Validator | System prompt leaks, canary exfiltration |
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      RAMPART CORE                          │
//! ├────────────────────────────────────────────────────────────┤
//! │                                                            │
//! │                 ┌──────────────────┐                       │
//! │   request ────▶ │  GuardPipeline   │ ────▶ proceed/reject  │
//! │                 └────────┬─────────┘                       │
//! │                          │                                 │
//! │          ┌───────────────┼────────────────┐                │
//! │          ▼               ▼                ▼                │
//! │   ┌────────────┐  ┌─────────────┐  ┌─────────────┐         │
//! │   │  Session   │  │ Input Guard │  │   Output    │         │
//! │   │ Isolation  │  │ + Tracker   │  │  Validator  │         │
//! │   └────────────┘  └─────────────┘  └─────────────┘         │
//! │                                                            │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use rampart_core::{GuardPipeline, RampartConfig, RequestContext, StageOutcome};
//!
//! let pipeline = GuardPipeline::new(RampartConfig::default())?;
//!
//! let context = RequestContext::new(
//!     "agent-7",
//!     "user-42",
//!     "session-12345678",
//!     "summarize this document",
//! );
//!
//! match pipeline.screen(&context)? {
//!     StageOutcome::Proceed { context } => {
//!         // hand the sanitized context to the agent
//!         assert_eq!(context.user_id, "user-42");
//!     }
//!     StageOutcome::Reject { failure } => {
//!         // refuse with failure.message, never with guard internals
//!         println!("refused: {}", failure.message);
//!     }
//! }
//! # Ok::<(), rampart_core::RampartError>(())
//! ```
//!
//! ## Security Notes
//!
//! - Stages run in order: isolation first, then the input guard
//! - Any stage can reject; a rejection ends the chain
//! - The pipeline is fail-closed: internal errors reject, never proceed
//! - Rejection messages are generic; detail goes to the structured log

mod config;
mod context;
mod error;
mod input_guard;
mod isolation;
mod pipeline;
mod stage;

pub use config::{
    EscalationConfig, GuardConfig, IsolationConfig, OutputConfig, PatternEntry, RampartConfig,
};
pub use context::RequestContext;
pub use error::RampartError;
pub use input_guard::InputGuardStage;
pub use isolation::{
    MetadataPolicy, SessionIsolationStage, DEFAULT_MAX_METADATA_VALUE_LEN,
    DEFAULT_MIN_SESSION_ID_LEN,
};
pub use pipeline::GuardPipeline;
pub use stage::{
    FailureCode, StageFailure, StageOutcome, MSG_INPUT_BLOCKED, MSG_INTERNAL, MSG_INVALID_SESSION,
};

// Re-export component types for convenience
pub use rampart_guard::{GuardDecision, OutputValidator, PatternGuard, PatternSet};
pub use rampart_tracker::{
    AlertEvent, AlertSink, AttackRecord, AttackTracker, ChannelAlert, LogAnalyzer, TracingAlert,
};

/// Core result type for pipeline operations.
pub type Result<T> = std::result::Result<T, RampartError>;

#[cfg(test)]
mod tests;
