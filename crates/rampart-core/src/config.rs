//! Configuration types for the Rampart pipeline.
//!
//! Every field has a default, so a config file only needs the entries it
//! changes. Pattern extension is append-only: configured rules join the
//! built-ins, they never replace them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rampart_guard::{DEFAULT_MAX_SENTENCE_BOUNDARIES, DEFAULT_SUSPICIOUS_THRESHOLD};
use rampart_tracker::DEFAULT_ALERT_THRESHOLD;

use crate::error::RampartError;
use crate::isolation::{DEFAULT_MAX_METADATA_VALUE_LEN, DEFAULT_MIN_SESSION_ID_LEN};
use crate::Result;

/// Configuration for the guard pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RampartConfig {
    /// Input guard configuration.
    pub guard: GuardConfig,

    /// Session isolation configuration.
    pub isolation: IsolationConfig,

    /// Repeat-offender escalation configuration.
    pub escalation: EscalationConfig,

    /// Output validation configuration.
    pub output: OutputConfig,
}

impl RampartConfig {
    /// Loads configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| RampartError::Config(format!("cannot read {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| RampartError::Config(format!("cannot parse {}: {e}", path.display())))
    }
}

/// A named pattern supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Rule name, unique across the whole set.
    pub name: String,
    /// Regular expression, compiled case-insensitively.
    pub pattern: String,
}

/// Input guard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Distinct suspicious patterns required to block.
    pub suspicious_threshold: usize,

    /// Sentence boundaries tolerated before an input counts as a flood.
    pub max_sentence_boundaries: usize,

    /// Blocked patterns appended after the built-ins.
    pub extra_blocked: Vec<PatternEntry>,

    /// Suspicious patterns appended after the built-ins.
    pub extra_suspicious: Vec<PatternEntry>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            suspicious_threshold: DEFAULT_SUSPICIOUS_THRESHOLD,
            max_sentence_boundaries: DEFAULT_MAX_SENTENCE_BOUNDARIES,
            extra_blocked: Vec::new(),
            extra_suspicious: Vec::new(),
        }
    }
}

/// Session isolation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationConfig {
    /// Minimum session identifier length, in characters.
    pub min_session_id_len: usize,

    /// Maximum admitted metadata string length, in characters.
    pub max_metadata_value_len: usize,
}

impl Default for IsolationConfig {
    fn default() -> Self {
        Self {
            min_session_id_len: DEFAULT_MIN_SESSION_ID_LEN,
            max_metadata_value_len: DEFAULT_MAX_METADATA_VALUE_LEN,
        }
    }
}

/// Repeat-offender escalation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Blocked inputs from one user before the alert sink fires.
    /// Zero disables alerting.
    pub alert_threshold: usize,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

/// Output validation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Literal prompt fragments registered as anchors at startup.
    pub anchors: Vec<String>,

    /// Forbidden patterns appended after the built-ins.
    pub extra_forbidden: Vec<PatternEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RampartConfig::default();
        assert_eq!(config.guard.suspicious_threshold, 3);
        assert_eq!(config.guard.max_sentence_boundaries, 10);
        assert_eq!(config.isolation.min_session_id_len, 8);
        assert_eq!(config.escalation.alert_threshold, 3);
        assert!(config.output.anchors.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let config = RampartConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: RampartConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{ "escalation": { "alert_threshold": 5 } }"#;
        let config: RampartConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.escalation.alert_threshold, 5);
        assert_eq!(config.guard.suspicious_threshold, 3);
    }

    #[test]
    fn test_pattern_entries_parse() {
        let json = r#"{
            "guard": {
                "extra_blocked": [
                    { "name": "grandma_exploit", "pattern": "act\\s+as\\s+my\\s+grandmother" }
                ]
            }
        }"#;
        let config: RampartConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.guard.extra_blocked.len(), 1);
        assert_eq!(config.guard.extra_blocked[0].name, "grandma_exploit");
    }
}
