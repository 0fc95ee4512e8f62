//! Analysis profile selection.

use crate::config::AnalysisConfig;
use crate::sanitize::ContentKind;

/// Engine effort tier. Selection is a pure lookup on content kind and the
/// deep-scan flag, never a branch on content value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisProfile {
    /// Fast tier for ordinary text
    Standard,
    /// Higher-effort tier for deep text scans
    Deep,
    /// Image-capable tier
    Vision,
}

impl AnalysisProfile {
    /// Select the profile for a scan
    pub fn select(kind: ContentKind, deep_scan: bool) -> Self {
        match (kind, deep_scan) {
            (ContentKind::Image, _) => AnalysisProfile::Vision,
            (ContentKind::Text, true) => AnalysisProfile::Deep,
            (ContentKind::Text, false) => AnalysisProfile::Standard,
        }
    }

    /// Model name for this profile
    pub fn model<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        match self {
            AnalysisProfile::Standard => &config.standard_model,
            AnalysisProfile::Deep => &config.deep_model,
            AnalysisProfile::Vision => &config.vision_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_selection_lookup() {
        assert_eq!(
            AnalysisProfile::select(ContentKind::Text, false),
            AnalysisProfile::Standard
        );
        assert_eq!(
            AnalysisProfile::select(ContentKind::Text, true),
            AnalysisProfile::Deep
        );
        assert_eq!(
            AnalysisProfile::select(ContentKind::Image, false),
            AnalysisProfile::Vision
        );
        // Deep-scan flag is ignored for images
        assert_eq!(
            AnalysisProfile::select(ContentKind::Image, true),
            AnalysisProfile::Vision
        );
    }

    #[test]
    fn test_profile_model_lookup() {
        let config = AnalysisConfig::default();
        assert_eq!(
            AnalysisProfile::Standard.model(&config),
            "gemini-3-flash-preview"
        );
        assert_eq!(AnalysisProfile::Deep.model(&config), "gemini-3-pro-preview");
        assert_eq!(
            AnalysisProfile::Vision.model(&config),
            "gemini-2.5-flash-image"
        );
    }
}
