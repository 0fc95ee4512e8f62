//! Rule evaluation over normalized text.

use serde::Serialize;

use super::rules::RuleSet;

/// Result of a heuristic pass: saturating score and matched labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeuristicResult {
    /// Total weight of matched rules, clamped to 100
    pub score: u8,
    /// Labels of matched rules, in table order, deduplicated by label
    pub indicators: Vec<String>,
}

/// Stateless scorer over a compiled rule table.
///
/// Pure function of its input: no side effects, deterministic, safe for
/// unlimited concurrent invocation.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEngine {
    rules: RuleSet,
}

impl HeuristicEngine {
    /// Create an engine over the given rule table
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// The active rule table
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Score normalized text against the rule table.
    ///
    /// Each matching rule contributes its weight once regardless of how
    /// many times its pattern occurs; labels are deduplicated the same
    /// way. The score saturates at 100.
    pub fn evaluate(&self, text: &str) -> HeuristicResult {
        let mut score: u32 = 0;
        let mut indicators: Vec<String> = Vec::new();

        for rule in &self.rules.rules {
            if rule.regex.is_match(text) {
                score = score.saturating_add(rule.weight);
                if !indicators.contains(&rule.label) {
                    indicators.push(rule.label.clone());
                }
            }
        }

        HeuristicResult {
            score: score.min(100) as u8,
            indicators,
        }
    }
}
