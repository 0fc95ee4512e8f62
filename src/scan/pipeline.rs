//! The scanning pipeline.
//!
//! Linear, single-pass flow: size check, normalization, heuristics
//! (text only), external analysis, merge. No retries - a failed analysis
//! degrades to a conservative verdict rather than being re-run, since a
//! stale retry could mask an active attack.

use bytes::Bytes;

use crate::analysis::{AnalysisClient, ExternalResult};
use crate::config::{Config, ScanLimits};
use crate::error::{Result, ScanError};
use crate::heuristics::{HeuristicEngine, HeuristicResult, RuleSet};
use crate::sanitize::{reencode_image, NormalizedContent, TextSanitizer};

use super::verdict::ScanVerdict;

/// One scan request as handed over by the transport layer.
///
/// Exactly one of text/image is expected to be populated; when both are,
/// the image wins.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Raw text, pre-capped by the transport layer
    pub text: Option<String>,
    /// Raw image bytes, already decoded from transport encoding
    pub image: Option<Bytes>,
    /// Request the higher-effort analysis tier
    pub deep_scan: bool,
}

enum RawInput {
    Text(String),
    Image(Bytes),
}

/// Top-level scan orchestrator.
///
/// Holds only immutable state and is safe to share across unlimited
/// concurrent scans.
pub struct Scanner {
    sanitizer: TextSanitizer,
    engine: HeuristicEngine,
    analysis: AnalysisClient,
    limits: ScanLimits,
}

impl Scanner {
    /// Build a scanner from startup configuration
    pub fn new(config: Config) -> Result<Self> {
        let rules = if config.rules.is_empty() {
            RuleSet::builtin()
        } else {
            RuleSet::from_entries(&config.rules)?
        };

        Ok(Self {
            sanitizer: TextSanitizer::new(),
            engine: HeuristicEngine::new(rules),
            analysis: AnalysisClient::new(config.analysis)?,
            limits: config.limits,
        })
    }

    /// The active heuristic engine
    pub fn heuristics(&self) -> &HeuristicEngine {
        &self.engine
    }

    /// Scan one request.
    ///
    /// Returns `Err` only for [`ScanError::InputTooLarge`], which the
    /// caller surfaces as an explicit rejection. Every other failure
    /// anywhere in the pipeline resolves to the fail-closed verdict; a
    /// raw error never escapes as the response.
    pub async fn scan(&self, request: ScanRequest) -> Result<ScanVerdict> {
        if let Some(text) = request.text.as_deref() {
            let chars = text.chars().count();
            if chars > self.limits.max_text_chars {
                return Err(ScanError::InputTooLarge {
                    size: chars,
                    limit: self.limits.max_text_chars,
                });
            }
        }

        let input = match (request.image, request.text) {
            (None, None) => return Ok(ScanVerdict::clean()),
            (Some(image), _) => RawInput::Image(image),
            (None, Some(text)) => RawInput::Text(text),
        };

        match self.run(input, request.deep_scan).await {
            Ok(verdict) => Ok(verdict),
            Err(e) => {
                // Operational log only: failure kind and resulting
                // verdict, never payload content.
                tracing::warn!(verdict = "suspicious", "scan failed closed: {e}");
                Ok(ScanVerdict::fail_closed())
            },
        }
    }

    async fn run(&self, input: RawInput, deep_scan: bool) -> Result<ScanVerdict> {
        let (content, heuristic) = match input {
            RawInput::Image(bytes) => {
                // CPU-bound decode/re-encode must not stall unrelated scans
                let max_bytes = self.limits.max_image_bytes;
                let reencoded =
                    tokio::task::spawn_blocking(move || reencode_image(&bytes, max_bytes))
                        .await??;
                (NormalizedContent::Image(reencoded), None)
            },
            RawInput::Text(text) => {
                let normalized = self.sanitizer.sanitize(&text);
                let heuristic = self.engine.evaluate(&normalized);
                (NormalizedContent::Text(normalized), Some(heuristic))
            },
        };

        let external = self.analysis.analyze(&content, deep_scan).await;

        Ok(merge(heuristic, external))
    }
}

/// Merge the heuristic and external signals into the final verdict.
///
/// The external verdict label is authoritative for categorization while
/// the score takes the numeric maximum of both stages, so a "safe" label
/// can legitimately carry a non-zero score when heuristics disagree.
/// Indicators are the union of both sets, deduplicated, heuristic labels
/// first.
fn merge(heuristic: Option<HeuristicResult>, external: ExternalResult) -> ScanVerdict {
    let heuristic = heuristic.unwrap_or_default();

    let mut indicators = heuristic.indicators;
    for label in external.indicators {
        if !indicators.contains(&label) {
            indicators.push(label);
        }
    }

    ScanVerdict {
        verdict: external.verdict,
        risk_score: heuristic.score.max(external.risk_score),
        reasoning: external.reasoning,
        advice: external.advice,
        indicators,
        sources: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Verdict;

    fn external(verdict: Verdict, score: u8, indicators: &[&str]) -> ExternalResult {
        ExternalResult {
            verdict,
            risk_score: score,
            reasoning: "reasoning".to_string(),
            advice: "advice".to_string(),
            indicators: indicators.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn test_merge_takes_higher_score() {
        let heuristic = HeuristicResult {
            score: 60,
            indicators: vec!["Urgency/Pressure tactics".to_string()],
        };
        let merged = merge(Some(heuristic), external(Verdict::Suspicious, 40, &[]));
        assert_eq!(merged.risk_score, 60);

        let heuristic = HeuristicResult {
            score: 10,
            indicators: vec![],
        };
        let merged = merge(Some(heuristic), external(Verdict::Scam, 95, &[]));
        assert_eq!(merged.risk_score, 95);
    }

    #[test]
    fn test_merge_external_verdict_is_authoritative() {
        // Observed policy: a "safe" label can coexist with a high
        // heuristic score.
        let heuristic = HeuristicResult {
            score: 60,
            indicators: vec!["Urgency/Pressure tactics".to_string()],
        };
        let merged = merge(Some(heuristic), external(Verdict::Safe, 5, &[]));
        assert_eq!(merged.verdict, Verdict::Safe);
        assert_eq!(merged.risk_score, 60);
    }

    #[test]
    fn test_merge_unions_and_dedups_indicators() {
        let heuristic = HeuristicResult {
            score: 30,
            indicators: vec![
                "Credential harvesting pattern".to_string(),
                "Raw IP address link".to_string(),
            ],
        };
        let merged = merge(
            Some(heuristic),
            external(
                Verdict::Scam,
                80,
                &["Raw IP address link", "Spoofed sender"],
            ),
        );
        assert_eq!(
            merged.indicators,
            vec![
                "Credential harvesting pattern",
                "Raw IP address link",
                "Spoofed sender",
            ]
        );
    }

    #[test]
    fn test_merge_without_heuristic_signal() {
        let merged = merge(None, external(Verdict::Suspicious, 50, &["AI Module Timeout"]));
        assert_eq!(merged.verdict, Verdict::Suspicious);
        assert_eq!(merged.risk_score, 50);
        assert_eq!(merged.indicators, vec!["AI Module Timeout"]);
        assert!(merged.sources.is_empty());
    }

    #[test]
    fn test_merge_carries_external_text() {
        let merged = merge(None, external(Verdict::Scam, 90, &[]));
        assert_eq!(merged.reasoning, "reasoning");
        assert_eq!(merged.advice, "advice");
    }
}
