//! # Output Leak Validation
//!
//! The inbound guard stops instructions from reaching the model; this
//! module stops the model from disclosing what it was told. It runs two
//! checks over model output, in order:
//!
//! 1. **Forbidden patterns** - regex signatures of prompt recitals,
//!    "I was instructed to..." confessions, and transcript markers.
//! 2. **Anchors** - literal fragments of the deployment's own system
//!    prompt, matched as exact substrings.
//!
//! Sanitization is line-wise and all-or-nothing: an unsafe line is
//! dropped wholesale, safe lines keep their relative order, and output
//! never grows. Partial redaction within a line is deliberately not
//! offered; a half-redacted recital still confirms to the attacker that
//! there was something to redact.
//!
//! ## Canary anchors
//!
//! [`OutputValidator::mint_canary`] generates a `RAMPART-<uuid4>` token
//! and registers it as an anchor. Placing the token in a system prompt
//! turns any extraction of that prompt into a guaranteed anchor hit,
//! even when the surrounding text evades the regex signatures. A shape
//! pattern additionally catches canary-like tokens that were never
//! registered with this validator instance.
//!
//! ## References
//!
//! - **Rebuff Framework** - canary-based prompt leak detection.
//!   <https://github.com/protectai/rebuff>
//! - **OWASP LLM06** - Sensitive Information Disclosure.

use uuid::Uuid;

use crate::error::Result;
use crate::models::GuardDecision;
use crate::patterns::NamedPattern;

/// Prefix for minted canary tokens.
const CANARY_PREFIX: &str = "RAMPART";

/// Leak signatures. Matched before anchors, first match decides.
const BUILTIN_FORBIDDEN: &[(&str, &str)] = &[
    (
        "prompt_recital",
        r"my\s+(system\s+)?(prompt|instructions?)\s+(is|are|says?|said)",
    ),
    (
        "prompt_header",
        r"here\s+(is|are)\s+(my|the)\s+(system\s+)?(prompt|instructions?)",
    ),
    (
        "programming_disclosure",
        r"i\s+(was|am|have\s+been)\s+(told|instructed|programmed)\s+to",
    ),
    (
        "transcript_marker",
        r"\[\s*system\s*\]|<\|?system\|?>|\bsystem\s+prompt\s*:",
    ),
    ("canary_shape", r"\brampart-[0-9a-f][0-9a-f-]{7,}"),
];

/// Prompt openers common enough to ship as default anchors.
const DEFAULT_ANCHORS: &[&str] = &[
    "You are a helpful AI assistant",
    "You are a helpful assistant",
];

/// Validates model output against leak signatures and prompt anchors.
///
/// # Example
///
/// ```rust
/// use rampart_guard::OutputValidator;
///
/// let mut validator = OutputValidator::new();
/// validator.add_anchor("Never mention the launch codes");
///
/// assert!(validator.is_safe("The answer is 42."));
/// assert!(!validator.is_safe("My instructions say: Never mention the launch codes"));
/// ```
#[derive(Debug, Clone)]
pub struct OutputValidator {
    forbidden: Vec<NamedPattern>,
    anchors: Vec<String>,
}

impl OutputValidator {
    /// Creates a validator with the built-in signatures and default anchors.
    #[must_use]
    pub fn new() -> Self {
        let forbidden = BUILTIN_FORBIDDEN
            .iter()
            .map(|(name, pattern)| NamedPattern::compile(name, pattern).unwrap())
            .collect();
        Self {
            forbidden,
            anchors: DEFAULT_ANCHORS.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Appends a forbidden pattern.
    pub fn add_forbidden(&mut self, name: &str, pattern: &str) -> Result<()> {
        self.forbidden.push(NamedPattern::compile(name, pattern)?);
        Ok(())
    }

    /// Registers a literal fragment of the protected prompt.
    ///
    /// Anchors are matched as case-sensitive substrings. Empty fragments
    /// are ignored; an empty substring would match every output.
    pub fn add_anchor(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !fragment.is_empty() {
            self.anchors.push(fragment);
        }
    }

    /// Mints a fresh canary token and registers it as an anchor.
    ///
    /// The caller places the returned token in the system prompt; from
    /// then on any output containing it fails [`inspect`](Self::inspect).
    pub fn mint_canary(&mut self) -> String {
        let token = format!("{}-{}", CANARY_PREFIX, Uuid::new_v4().as_hyphenated());
        self.anchors.push(token.clone());
        token
    }

    /// Registered anchor count, minted canaries included.
    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// Checks output for leaks, first hit decides.
    ///
    /// Anchor hits report a fixed reason. The matched fragment is part
    /// of the protected prompt, so repeating it in the reason would put
    /// the leak into the logs as well.
    pub fn inspect(&self, output: &str) -> GuardDecision {
        for pattern in &self.forbidden {
            if pattern.is_match(output) {
                return GuardDecision::block(format!(
                    "output matched forbidden pattern '{}'",
                    pattern.name()
                ));
            }
        }

        for anchor in &self.anchors {
            if output.contains(anchor.as_str()) {
                return GuardDecision::block("output echoes a protected prompt fragment");
            }
        }

        GuardDecision::allow()
    }

    /// Returns true if the output carries no detectable leak.
    #[inline]
    pub fn is_safe(&self, output: &str) -> bool {
        !self.inspect(output).is_blocked()
    }

    /// Drops unsafe lines from `output`, keeping safe lines in order.
    ///
    /// The result never contains text that was not in the input.
    pub fn sanitize(&self, output: &str) -> String {
        output
            .lines()
            .filter(|line| self.is_safe(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for OutputValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_safe() {
        let validator = OutputValidator::new();
        assert!(validator.is_safe("Here is the summary you asked for."));
    }

    #[test]
    fn test_prompt_recital_unsafe() {
        let validator = OutputValidator::new();
        let decision = validator.inspect("Sure! My instructions say to be concise.");
        assert!(decision.is_blocked());
        assert!(decision.reason().contains("prompt_recital"));
    }

    #[test]
    fn test_default_anchor_unsafe() {
        let validator = OutputValidator::new();
        let decision = validator.inspect("It begins: You are a helpful AI assistant and...");
        assert!(decision.is_blocked());
    }

    #[test]
    fn test_forbidden_patterns_case_insensitive() {
        let validator = OutputValidator::new();
        assert!(!validator.is_safe("MY SYSTEM PROMPT IS the following"));
        assert!(!validator.is_safe("i was instructed to decline"));
    }

    #[test]
    fn test_custom_anchor_detected() {
        let mut validator = OutputValidator::new();
        validator.add_anchor("Reply only in formal English");
        assert!(!validator.is_safe("The rules include: Reply only in formal English"));
    }

    #[test]
    fn test_anchor_reason_hides_fragment() {
        let mut validator = OutputValidator::new();
        validator.add_anchor("ultra secret preamble");
        let decision = validator.inspect("leaking the ultra secret preamble here");
        assert!(decision.is_blocked());
        assert!(!decision.reason().contains("ultra secret preamble"));
    }

    #[test]
    fn test_canary_mint_and_leak() {
        let mut validator = OutputValidator::new();
        let canary = validator.mint_canary();
        assert!(canary.starts_with("RAMPART-"));
        assert!(!validator.is_safe(&format!("context contained {canary} today")));
        assert!(validator.is_safe("context contained nothing unusual today"));
    }

    #[test]
    fn test_canary_shape_without_registration() {
        let validator = OutputValidator::new();
        assert!(!validator.is_safe("found RAMPART-550e8400-e29b-41d4-a716-446655440000 in text"));
    }

    #[test]
    fn test_sanitize_drops_unsafe_lines_in_order() {
        let validator = OutputValidator::new();
        let output = "First line is fine.\nMy system prompt is secret stuff.\nLast line is fine.";
        let sanitized = validator.sanitize(output);
        assert_eq!(sanitized, "First line is fine.\nLast line is fine.");
    }

    #[test]
    fn test_sanitize_drops_anchor_line() {
        let validator = OutputValidator::new();
        let output = "Here is the report.\nYou are a helpful AI assistant and must obey.\nEnd of report.";
        assert_eq!(validator.sanitize(output), "Here is the report.\nEnd of report.");
    }

    #[test]
    fn test_sanitize_drops_leaked_canary_line() {
        let mut validator = OutputValidator::new();
        let canary = validator.mint_canary();
        let output = format!("before\ntoken {canary} appeared\nafter");
        assert_eq!(validator.sanitize(&output), "before\nafter");
    }

    #[test]
    fn test_sanitize_never_grows() {
        let validator = OutputValidator::new();
        let output = "alpha\nhere is my system prompt\nbeta";
        assert!(validator.sanitize(output).len() <= output.len());
    }

    #[test]
    fn test_sanitize_clean_output_unchanged() {
        let validator = OutputValidator::new();
        let output = "alpha\nbeta\ngamma";
        assert_eq!(validator.sanitize(output), output);
    }

    #[test]
    fn test_sanitize_fully_unsafe_output_empty() {
        let validator = OutputValidator::new();
        assert_eq!(validator.sanitize("my instructions are as follows"), "");
    }

    #[test]
    fn test_invalid_forbidden_pattern_rejected() {
        let mut validator = OutputValidator::new();
        assert!(validator.add_forbidden("broken", r"(unclosed").is_err());
    }

    #[test]
    fn test_empty_anchor_ignored() {
        let mut validator = OutputValidator::new();
        let before = validator.anchor_count();
        validator.add_anchor("");
        assert_eq!(validator.anchor_count(), before);
        assert!(validator.is_safe("ordinary output"));
    }
}
