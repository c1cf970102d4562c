//! # Injection Pattern Tables
//!
//! Named, ordered detection patterns in two tiers:
//!
//! - **Blocked** patterns are high-confidence attack signatures. A single
//!   match is enough to reject the input.
//! - **Suspicious** patterns are privilege and secrecy vocabulary that is
//!   harmless alone but telling in clusters. They only contribute to a
//!   co-occurrence count; see [`crate::guard::PatternGuard`].
//!
//! All patterns compile case-insensitively, built-in and appended alike.
//! Extension is append-only: deployments can add rules at startup but can
//! never remove or reorder the built-ins, so the ordering guarantees of
//! the classifier hold across configurations.
//!
//! The active rule list has a SHA-256 [`fingerprint`](PatternSet::fingerprint)
//! that is logged at startup. When an operator is staring at a block they
//! cannot explain, the fingerprint tells them which rule revision produced it.

use std::fmt::Write as _;

use regex::RegexBuilder;
use sha2::{Digest, Sha256};

use crate::error::{GuardError, Result};

/// High-confidence attack phrasings. First match wins, in this order.
const BUILTIN_BLOCKED: &[(&str, &str)] = &[
    // Direct instruction override attempts
    (
        "instruction_override",
        r"ignore\s+(all\s+)?(previous|prior|above)\s+(instructions?|prompts?|rules?)",
    ),
    (
        "instruction_disregard",
        r"disregard\s+(all\s+)?(your\s+)?(previous|prior|above)\s+(instructions?|prompts?|rules?|guidelines?)",
    ),
    (
        "context_reset",
        r"forget\s+(everything|all|what)\s+(you|i)?\s*(know|said|told|learned)",
    ),
    ("instruction_injection", r"new\s+instructions?\s*:"),
    // System prompt extraction
    (
        "prompt_extraction",
        r"(show|reveal|display|print|output|repeat)\s+(me\s+)?(your|the)\s+(system\s+)?(prompt|instructions?)",
    ),
    (
        "prompt_query",
        r"what\s+(are|is)\s+(your|the)\s+(system\s+)?(instructions?|prompt|rules?)",
    ),
    // Role hijacking
    ("mode_switch", r"you\s+are\s+now\s+(a|an|in)\s+\w+\s+mode"),
    (
        "persona_hijack",
        r"(pretend|act|imagine|roleplay)\s+(you('?re| are)|as if you('?re| are))\s+(not\s+)?(an?\s+)?ai",
    ),
    // DAN-style jailbreaks
    (
        "dan_jailbreak",
        r"\b(jailbreak|do\s+anything\s+now|dan\s+mode)\b",
    ),
    (
        "developer_mode",
        r"(enable|activate|enter|unlock)\s+developer\s+mode",
    ),
];

/// Privilege and secrecy vocabulary. Individually benign; counted as
/// distinct hits by the co-occurrence heuristic.
const BUILTIN_SUSPICIOUS: &[(&str, &str)] = &[
    ("system", r"\bsystem\b"),
    ("admin", r"\badmin(istrator)?\b"),
    ("root", r"\broot\b"),
    ("developer", r"\bdeveloper\b"),
    ("override", r"\boverride\b"),
    ("password", r"\bpassword\b"),
    ("secret", r"\bsecrets?\b"),
    ("bypass", r"\bbypass\b"),
    ("credentials", r"\bcredentials?\b"),
    ("sudo", r"\bsudo\b"),
];

/// A named, compiled detection pattern.
#[derive(Debug, Clone)]
pub struct NamedPattern {
    name: String,
    regex: regex::Regex,
}

impl NamedPattern {
    /// Compiles a pattern case-insensitively.
    pub fn compile(name: &str, pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| GuardError::InvalidPattern {
                name: name.to_string(),
                source,
            })?;
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    /// Name the pattern was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the pattern matches anywhere in `text`.
    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The source expression, as registered.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// The ordered rule set driving classification.
#[derive(Debug, Clone)]
pub struct PatternSet {
    blocked: Vec<NamedPattern>,
    suspicious: Vec<NamedPattern>,
}

impl PatternSet {
    /// The built-in rule set.
    pub fn builtin() -> Self {
        let mut set = Self::empty();
        for (name, pattern) in BUILTIN_BLOCKED {
            set.append_blocked(name, pattern).unwrap();
        }
        for (name, pattern) in BUILTIN_SUSPICIOUS {
            set.append_suspicious(name, pattern).unwrap();
        }
        set
    }

    /// An empty rule set. Mostly useful for tests and bespoke deployments.
    pub fn empty() -> Self {
        Self {
            blocked: Vec::new(),
            suspicious: Vec::new(),
        }
    }

    /// Appends a blocked pattern at the end of the evaluation order.
    pub fn append_blocked(&mut self, name: &str, pattern: &str) -> Result<()> {
        self.check_name(name)?;
        self.blocked.push(NamedPattern::compile(name, pattern)?);
        Ok(())
    }

    /// Appends a suspicious pattern at the end of the evaluation order.
    pub fn append_suspicious(&mut self, name: &str, pattern: &str) -> Result<()> {
        self.check_name(name)?;
        self.suspicious.push(NamedPattern::compile(name, pattern)?);
        Ok(())
    }

    /// Blocked patterns in evaluation order.
    pub fn blocked(&self) -> &[NamedPattern] {
        &self.blocked
    }

    /// Suspicious patterns in evaluation order.
    pub fn suspicious(&self) -> &[NamedPattern] {
        &self.suspicious
    }

    /// SHA-256 digest over every rule name and expression, hex encoded.
    ///
    /// Stable across runs for the same rule list; any append changes it.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for pattern in self.blocked.iter().chain(self.suspicious.iter()) {
            hasher.update(pattern.name().as_bytes());
            hasher.update([0u8]);
            hasher.update(pattern.as_str().as_bytes());
            hasher.update([0u8]);
        }
        let digest = hasher.finalize();
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        hex
    }

    fn check_name(&self, name: &str) -> Result<()> {
        let taken = self
            .blocked
            .iter()
            .chain(self.suspicious.iter())
            .any(|p| p.name() == name);
        if taken {
            return Err(GuardError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_nonempty() {
        let set = PatternSet::builtin();
        assert!(!set.blocked().is_empty());
        assert!(!set.suspicious().is_empty());
    }

    #[test]
    fn test_patterns_case_insensitive() {
        let set = PatternSet::builtin();
        let ignore = &set.blocked()[0];
        assert!(ignore.is_match("IGNORE PREVIOUS INSTRUCTIONS"));
        assert!(ignore.is_match("ignore previous instructions"));
    }

    #[test]
    fn test_append_extends_set() {
        let mut set = PatternSet::builtin();
        let before = set.blocked().len();
        set.append_blocked("grandma_exploit", r"act\s+as\s+my\s+grandmother")
            .unwrap();
        assert_eq!(set.blocked().len(), before + 1);
        assert_eq!(set.blocked().last().unwrap().name(), "grandma_exploit");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let mut set = PatternSet::builtin();
        let err = set.append_blocked("broken", r"[unclosed").unwrap_err();
        assert!(matches!(err, GuardError::InvalidPattern { .. }));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut set = PatternSet::builtin();
        let err = set.append_suspicious("system", r"\bkernel\b").unwrap_err();
        assert!(matches!(err, GuardError::DuplicateName(name) if name == "system"));
    }

    #[test]
    fn test_fingerprint_stable() {
        assert_eq!(
            PatternSet::builtin().fingerprint(),
            PatternSet::builtin().fingerprint()
        );
    }

    #[test]
    fn test_fingerprint_changes_on_append() {
        let mut set = PatternSet::builtin();
        let before = set.fingerprint();
        set.append_suspicious("token", r"\btoken\b").unwrap();
        assert_ne!(before, set.fingerprint());
    }
}
