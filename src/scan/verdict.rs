//! Verdict types returned to the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Final risk classification. Never any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// No risk signal
    Safe,
    /// Uncertain or degraded analysis; treat with caution
    Suspicious,
    /// Positive scam identification
    Scam,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::Suspicious => write!(f, "suspicious"),
            Verdict::Scam => write!(f, "scam"),
        }
    }
}

impl FromStr for Verdict {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Verdict::Safe),
            "suspicious" => Ok(Verdict::Suspicious),
            "scam" => Ok(Verdict::Scam),
            other => Err(ScanError::Analysis(format!(
                "unrecognized verdict label: {other:?}"
            ))),
        }
    }
}

/// Reserved extension point for grounding citations. Always empty in this
/// core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    /// Source title
    pub title: String,
    /// Source URL
    pub url: String,
}

/// Final scan result returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanVerdict {
    /// Risk classification
    pub verdict: Verdict,
    /// Risk score, always within 0-100
    pub risk_score: u8,
    /// Explanation of the verdict
    pub reasoning: String,
    /// Remediation advice
    pub advice: String,
    /// Detected risk signals, deduplicated
    pub indicators: Vec<String>,
    /// Grounding citations (reserved, always empty)
    pub sources: Vec<GroundingSource>,
}

impl ScanVerdict {
    /// Zero verdict for requests carrying no content at all
    pub fn clean() -> Self {
        Self {
            verdict: Verdict::Safe,
            risk_score: 0,
            reasoning: String::new(),
            advice: String::new(),
            indicators: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Top-level fail-closed verdict. The last line of defense: any
    /// failure the pipeline cannot attribute to a specific stage resolves
    /// here instead of escaping as an error.
    pub fn fail_closed() -> Self {
        Self {
            verdict: Verdict::Suspicious,
            risk_score: 50,
            reasoning: "A security boundary was triggered during analysis.".to_string(),
            advice: "Treat this content as untrusted.".to_string(),
            indicators: vec!["Kernel Exception".to_string()],
            sources: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Scam).unwrap(), "\"scam\"");
        assert_eq!(serde_json::to_string(&Verdict::Safe).unwrap(), "\"safe\"");
    }

    #[test]
    fn test_verdict_parse_case_insensitive() {
        assert_eq!("SAFE".parse::<Verdict>().unwrap(), Verdict::Safe);
        assert_eq!(" Suspicious ".parse::<Verdict>().unwrap(), Verdict::Suspicious);
        assert_eq!("scam".parse::<Verdict>().unwrap(), Verdict::Scam);
    }

    #[test]
    fn test_verdict_parse_rejects_unknown() {
        assert!("malicious".parse::<Verdict>().is_err());
        assert!("".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_clean_verdict_shape() {
        let v = ScanVerdict::clean();
        assert_eq!(v.verdict, Verdict::Safe);
        assert_eq!(v.risk_score, 0);
        assert!(v.indicators.is_empty());
        assert!(v.sources.is_empty());
    }

    #[test]
    fn test_fail_closed_verdict_shape() {
        let v = ScanVerdict::fail_closed();
        assert_eq!(v.verdict, Verdict::Suspicious);
        assert_eq!(v.risk_score, 50);
        assert_eq!(v.indicators, vec!["Kernel Exception"]);
    }

    #[test]
    fn test_scan_verdict_json_shape() {
        let v = ScanVerdict::fail_closed();
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["verdict"], "suspicious");
        assert_eq!(json["risk_score"], 50);
        assert!(json["sources"].as_array().unwrap().is_empty());
    }
}
