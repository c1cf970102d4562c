//! The unified guard pipeline facade.
//!
//! This module provides the main entry point for Rampart. The
//! [`GuardPipeline`] struct wires the stages together from one
//! [`RampartConfig`] and exposes a small API for screening requests and
//! validating output.

use std::sync::Arc;

use tracing::{debug, info};

use rampart_guard::{GuardDecision, OutputValidator, PatternGuard, PatternSet};
use rampart_tracker::{AlertSink, AttackTracker, TracingAlert, TrackerConfig};

use crate::config::RampartConfig;
use crate::context::RequestContext;
use crate::input_guard::InputGuardStage;
use crate::isolation::{MetadataPolicy, SessionIsolationStage};
use crate::stage::StageOutcome;
use crate::Result;

/// The assembled Rampart defense.
///
/// Screening runs session isolation first, then the input guard. Either
/// stage can reject; a rejection ends the chain. Output validation is a
/// separate call because it happens after the agent has produced a
/// response.
///
/// # Security Model
///
/// 1. Session isolation (identity checks, metadata scrubbing)
/// 2. Input guard (pattern classification, attack tracking)
/// 3. Output validation (leak signatures, prompt anchors)
///
/// Construction is fail-closed: a config with an invalid pattern refuses
/// to build rather than running with a partial rule set.
///
/// # Example
///
/// ```
/// use rampart_core::{GuardPipeline, RampartConfig, RequestContext};
///
/// let pipeline = GuardPipeline::new(RampartConfig::default())?;
/// let context = RequestContext::new("agent-7", "user-42", "session-12345678", "hello");
/// assert!(pipeline.screen(&context)?.is_proceed());
/// # Ok::<(), rampart_core::RampartError>(())
/// ```
pub struct GuardPipeline {
    /// Configuration the pipeline was built from.
    config: RampartConfig,

    /// Shared classifier behind the input guard.
    guard: Arc<PatternGuard>,

    /// Identity checks and metadata scrubbing.
    isolation: SessionIsolationStage,

    /// Pattern screening with attack tracking.
    input_guard: InputGuardStage,

    /// Cross-request attack bookkeeping.
    tracker: Arc<AttackTracker>,

    /// Outbound leak validation.
    output: OutputValidator,
}

impl GuardPipeline {
    /// Builds a pipeline with the default tracing alert sink.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured pattern fails to compile or
    /// collides with an existing rule name.
    pub fn new(config: RampartConfig) -> Result<Self> {
        Self::with_alert_sink(config, Arc::new(TracingAlert))
    }

    /// Builds a pipeline that escalates repeat offenders to `sink`.
    pub fn with_alert_sink(config: RampartConfig, sink: Arc<dyn AlertSink>) -> Result<Self> {
        let mut patterns = PatternSet::builtin();
        for entry in &config.guard.extra_blocked {
            patterns.append_blocked(&entry.name, &entry.pattern)?;
        }
        for entry in &config.guard.extra_suspicious {
            patterns.append_suspicious(&entry.name, &entry.pattern)?;
        }

        info!(
            fingerprint = %patterns.fingerprint(),
            blocked = patterns.blocked().len(),
            suspicious = patterns.suspicious().len(),
            "pattern guard initialized"
        );

        let guard = Arc::new(
            PatternGuard::with_patterns(patterns)
                .with_suspicious_threshold(config.guard.suspicious_threshold)
                .with_max_boundaries(config.guard.max_sentence_boundaries),
        );

        let mut output = OutputValidator::new();
        for entry in &config.output.extra_forbidden {
            output.add_forbidden(&entry.name, &entry.pattern)?;
        }
        for anchor in &config.output.anchors {
            output.add_anchor(anchor.clone());
        }

        let tracker = Arc::new(
            AttackTracker::new(Arc::clone(&guard))
                .with_config(
                    TrackerConfig::new().with_alert_threshold(config.escalation.alert_threshold),
                )
                .with_alert_sink(sink),
        );

        let isolation = SessionIsolationStage::new()
            .with_min_session_id_len(config.isolation.min_session_id_len)
            .with_policy(
                MetadataPolicy::new().with_max_value_len(config.isolation.max_metadata_value_len),
            );
        let input_guard = InputGuardStage::new(Arc::clone(&tracker));

        Ok(Self {
            config,
            guard,
            isolation,
            input_guard,
            tracker,
            output,
        })
    }

    /// Screens an inbound request through the stage chain.
    ///
    /// On `Proceed` the returned context is the sanitized copy the agent
    /// should receive, not the caller's original.
    pub fn screen(&self, context: &RequestContext) -> Result<StageOutcome> {
        debug!(
            agent = %context.agent_id,
            user = %context.user_id,
            "screening request"
        );
        match self.isolation.validate(context) {
            StageOutcome::Proceed { context } => Ok(self.input_guard.process(&context)),
            rejection => Ok(rejection),
        }
    }

    /// Checks agent output for prompt leaks without modifying it.
    #[must_use]
    pub fn inspect_output(&self, output: &str) -> GuardDecision {
        self.output.inspect(output)
    }

    /// True when `output` carries no leak signature or anchor hit.
    #[must_use]
    pub fn is_output_safe(&self, output: &str) -> bool {
        self.output.is_safe(output)
    }

    /// Drops unsafe lines from `output`, keeping safe lines in order.
    #[must_use]
    pub fn sanitize_output(&self, output: &str) -> String {
        self.output.sanitize(output)
    }

    /// Mints a canary token and registers it as an output anchor.
    ///
    /// Place the returned token inside the system prompt it protects.
    pub fn mint_canary(&mut self) -> String {
        self.output.mint_canary()
    }

    /// The attack tracker, for status queries and record export.
    #[must_use]
    pub fn tracker(&self) -> &AttackTracker {
        &self.tracker
    }

    /// The classifier shared with the input guard.
    #[must_use]
    pub fn guard(&self) -> &PatternGuard {
        &self.guard
    }

    /// The output validator.
    #[must_use]
    pub fn output_validator(&self) -> &OutputValidator {
        &self.output
    }

    /// The configuration the pipeline was built from.
    #[must_use]
    pub fn config(&self) -> &RampartConfig {
        &self.config
    }
}

impl std::fmt::Debug for GuardPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
