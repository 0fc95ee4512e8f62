//! Engine invocation and response sanitization.

use std::time::Duration;

use base64::Engine as _;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::profile::AnalysisProfile;
use crate::config::AnalysisConfig;
use crate::error::{Result, ScanError};
use crate::sanitize::{strip_markup, NormalizedContent};
use crate::scan::Verdict;

/// Fixed audit instruction sent with every request
const AUDIT_INSTRUCTION: &str = "Perform a forensic security audit on the provided message. \
Identify phishing, financial scams, or social engineering. \
Output ONLY valid JSON with keys: verdict (safe, suspicious, scam), \
risk_score (0-100), reasoning, advice, indicators (array).";

/// Media type declared for image payloads; normalization guarantees JPEG
const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Canned reasoning for the fail-closed result
pub const FAILSAFE_REASONING: &str = "Deep analysis could not be completed securely.";

/// Canned advice for the fail-closed result
pub const FAILSAFE_ADVICE: &str = "Review manually and do not trust links.";

/// Singleton indicator marking an analysis-module failure
pub const FAILSAFE_INDICATOR: &str = "AI Module Timeout";

lazy_static! {
    /// Code-fence markers the engine may wrap its JSON in
    static ref CODE_FENCE: Regex = Regex::new(r"```(?:json)?\n?|```").expect("valid regex");
}

/// Sanitized result of one engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalResult {
    /// Engine's risk classification
    pub verdict: Verdict,
    /// Engine's risk score, clamped to 0-100
    pub risk_score: u8,
    /// Stripped reasoning text
    pub reasoning: String,
    /// Stripped advice text
    pub advice: String,
    /// Stripped indicator labels
    pub indicators: Vec<String>,
}

impl ExternalResult {
    /// Canned result returned on any adapter failure
    pub fn fail_closed() -> Self {
        Self {
            verdict: Verdict::Suspicious,
            risk_score: 50,
            reasoning: FAILSAFE_REASONING.to_string(),
            advice: FAILSAFE_ADVICE.to_string(),
            indicators: vec![FAILSAFE_INDICATOR.to_string()],
        }
    }
}

// Engine wire format (generateContent)

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl RequestPart {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    fn inline_data(mime_type: &str, data: String) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.to_string(),
                data,
            }),
        }
    }
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Raw analysis payload before validation. All keys are required; a
/// response missing any of them is a stage failure, not a partial
/// success.
#[derive(Deserialize)]
struct RawAnalysis {
    verdict: String,
    risk_score: i64,
    reasoning: String,
    advice: String,
    indicators: Vec<String>,
}

/// Client for the external analysis engine.
///
/// Holds the immutable credential and a timeout-bearing HTTP client.
/// Cheap to share; all scans in the process use one instance.
pub struct AnalysisClient {
    http: Client,
    config: AnalysisConfig,
}

impl AnalysisClient {
    /// Create a client from startup configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScanError::Analysis(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Analyze normalized content.
    ///
    /// Never errors: every failure path - missing credential, transport
    /// error, timeout, malformed response - resolves to
    /// [`ExternalResult::fail_closed`], logged with the failure kind only.
    pub async fn analyze(&self, content: &NormalizedContent, deep_scan: bool) -> ExternalResult {
        match self.request(content, deep_scan).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(verdict = "suspicious", "external analysis failed closed: {e}");
                ExternalResult::fail_closed()
            },
        }
    }

    async fn request(
        &self,
        content: &NormalizedContent,
        deep_scan: bool,
    ) -> Result<ExternalResult> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ScanError::Analysis("no API credential configured".to_string()));
        };

        let profile = AnalysisProfile::select(content.kind(), deep_scan);
        let model = profile.model(&self.config);
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        );

        let request = build_request(content);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScanError::Analysis(format!(
                "engine returned HTTP {}",
                response.status()
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let raw_text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| ScanError::Analysis("empty engine response".to_string()))?;

        parse_analysis(raw_text)
    }
}

/// Build the engine request for one piece of normalized content
fn build_request(content: &NormalizedContent) -> GenerateContentRequest {
    let parts = match content {
        NormalizedContent::Text(text) => {
            vec![RequestPart::text(format!(
                "{AUDIT_INSTRUCTION}\n\nINPUT: {text}"
            ))]
        },
        NormalizedContent::Image(bytes) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
            vec![
                RequestPart::text(AUDIT_INSTRUCTION.to_string()),
                RequestPart::inline_data(IMAGE_MIME_TYPE, encoded),
            ]
        },
    };

    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
    }
}

/// Parse and sanitize the engine's response text.
///
/// Strips surrounding code fences, parses strict JSON with all five
/// required keys, rejects verdict labels outside the enum, clamps the
/// score, and re-strips every free-text field - the engine's output
/// could itself encode an injection attempt aimed at a downstream
/// renderer.
fn parse_analysis(raw: &str) -> Result<ExternalResult> {
    let stripped = CODE_FENCE.replace_all(raw, "");
    let parsed: RawAnalysis = serde_json::from_str(stripped.trim())
        .map_err(|e| ScanError::Analysis(format!("malformed engine response: {e}")))?;

    let verdict: Verdict = parsed.verdict.parse()?;

    Ok(ExternalResult {
        verdict,
        risk_score: parsed.risk_score.clamp(0, 100) as u8,
        reasoning: strip_markup(&parsed.reasoning).trim().to_string(),
        advice: strip_markup(&parsed.advice).trim().to_string(),
        indicators: parsed
            .indicators
            .iter()
            .map(|label| strip_markup(label).trim().to_string())
            .collect(),
    })
}
