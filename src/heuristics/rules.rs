//! Heuristic scam signatures.
//!
//! Ordered table of (pattern, label, weight) entries. Patterns are
//! case-insensitive regular expressions matched anywhere in the
//! normalized text.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// One rule table entry: pattern, indicator label, score weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Regular expression matched anywhere in the text
    pub pattern: String,
    /// Human-readable indicator label reported on match
    pub label: String,
    /// Score contribution when the pattern matches
    pub weight: u32,
}

impl RuleEntry {
    fn new(pattern: &str, label: &str, weight: u32) -> Self {
        Self {
            pattern: pattern.to_string(),
            label: label.to_string(),
            weight,
        }
    }
}

/// Builtin scam signature table
pub fn default_rules() -> Vec<RuleEntry> {
    vec![
        RuleEntry::new(
            r"(?i)(urgent|act now|immediate|action required|suspended|locked|unauthorized)",
            "Urgency/Pressure tactics",
            20,
        ),
        RuleEntry::new(
            r"(?i)(winner|lottery|prize|gift card|inherited|million|jackpot)",
            "Suspicious reward promise",
            25,
        ),
        RuleEntry::new(
            r"(?i)(verify your account|update password|login here|confirm details)",
            "Credential harvesting pattern",
            30,
        ),
        RuleEntry::new(
            r"(?i)(bit\.ly|t\.co|tinyurl\.com|ow\.ly|is\.gd)",
            "URL shortener (Potential obfuscation)",
            10,
        ),
        RuleEntry::new(
            r"(?i)(\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
            "Raw IP address link",
            15,
        ),
    ]
}

/// A single compiled rule
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) regex: Regex,
    pub(crate) label: String,
    pub(crate) weight: u32,
}

/// Precompiled, ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// Compile a rule table from entries. Fails on the first invalid
    /// pattern so a broken config is caught at startup, not at scan time.
    pub fn from_entries(entries: &[RuleEntry]) -> Result<Self> {
        let rules = entries
            .iter()
            .map(|entry| {
                Regex::new(&entry.pattern)
                    .map(|regex| CompiledRule {
                        regex,
                        label: entry.label.clone(),
                        weight: entry.weight,
                    })
                    .map_err(|e| {
                        ScanError::Config(format!("invalid rule pattern {:?}: {e}", entry.pattern))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Compile the builtin table. Builtin patterns are known-good; any
    /// that somehow fail to compile are skipped rather than panicking.
    pub fn builtin() -> Self {
        let rules = default_rules()
            .into_iter()
            .filter_map(|entry| {
                Regex::new(&entry.pattern).ok().map(|regex| CompiledRule {
                    regex,
                    label: entry.label,
                    weight: entry.weight,
                })
            })
            .collect();

        Self { rules }
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}
