//! Configuration management.
//!
//! Supports configuration from:
//! - TOML config files
//! - Environment variables
//!
//! All configuration is read once at process start and is immutable for
//! the lifetime of the process. The external-engine credential lives here
//! and is passed explicitly into the analysis adapter; there is no ambient
//! global state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};
use crate::heuristics::RuleEntry;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// External analysis engine configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Input size limits
    #[serde(default)]
    pub limits: ScanLimits,

    /// Heuristic rule table. Empty means the builtin table is used.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ScanError::Config(format!("Failed to read config file: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| ScanError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables onto this configuration
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("SCAMSHIELD_API_KEY") {
            self.analysis.api_key = Some(key);
        } else if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.analysis.api_key = Some(key);
        }

        if let Ok(endpoint) = std::env::var("SCAMSHIELD_ENDPOINT") {
            self.analysis.endpoint = endpoint;
        }

        if let Ok(secs) = std::env::var("SCAMSHIELD_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                self.analysis.timeout_secs = secs;
            }
        }
    }

    /// Default config file location (`~/.config/scamshield/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("scamshield").join("config.toml"))
    }
}

/// External analysis engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// API credential. Absent means every analysis resolves to the
    /// fail-closed result.
    pub api_key: Option<String>,

    /// Engine API base URL
    pub endpoint: String,

    /// Model for ordinary text scans (fast tier)
    pub standard_model: String,

    /// Model for deep text scans (higher-effort tier)
    pub deep_model: String,

    /// Model for image scans (vision tier)
    pub vision_model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            standard_model: "gemini-3-flash-preview".to_string(),
            deep_model: "gemini-3-pro-preview".to_string(),
            vision_model: "gemini-2.5-flash-image".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Input size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanLimits {
    /// Maximum text length in characters, enforced before normalization
    pub max_text_chars: usize,

    /// Maximum image payload size in bytes, after transport decoding
    pub max_image_bytes: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_text_chars: 5000,
            max_image_bytes: crate::sanitize::MAX_IMAGE_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_text_chars, 5000);
        assert_eq!(config.limits.max_image_bytes, 2 * 1024 * 1024);
        assert!(config.analysis.api_key.is_none());
        assert_eq!(config.analysis.standard_model, "gemini-3-flash-preview");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_config_from_toml() {
        let toml = r#"
            [analysis]
            api_key = "test-key"
            endpoint = "https://engine.example.com/v1"
            standard_model = "fast-1"
            deep_model = "deep-1"
            vision_model = "vision-1"
            timeout_secs = 10

            [limits]
            max_text_chars = 2000
            max_image_bytes = 1048576

            [[rules]]
            pattern = "(?i)free money"
            label = "Too good to be true"
            weight = 40
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.analysis.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.analysis.deep_model, "deep-1");
        assert_eq!(config.limits.max_text_chars, 2000);
        assert_eq!(config.rules.len(), 1);
        assert_eq!(config.rules[0].weight, 40);
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[limits]\nmax_text_chars = 1234\nmax_image_bytes = 5678"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.limits.max_text_chars, 1234);
        assert_eq!(config.limits.max_image_bytes, 5678);
    }

    #[test]
    fn test_config_missing_file() {
        let result = Config::from_file("/nonexistent/scamshield.toml");
        assert!(result.is_err());
    }
}
