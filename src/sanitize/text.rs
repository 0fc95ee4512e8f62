//! Zero-trust text normalization.
//!
//! No tag is ever allowed through: script and style bodies are removed
//! outright, every remaining markup construct is stripped, and control
//! characters other than newline, carriage return, and tab are dropped.
//! URL rewriting is best-effort; a URL that fails to parse passes through
//! unchanged rather than failing the whole normalization.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

/// Query-parameter name prefixes dropped during URL rewriting
pub const DEFAULT_TRACKING_PREFIXES: &[&str] = &["utm_", "clickid", "fbcl"];

lazy_static! {
    /// Script/style elements are removed together with their content
    static ref EMBEDDED_BLOCK: Regex =
        Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>")
            .expect("valid regex");

    /// Any remaining markup construct
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]*>").expect("valid regex");

    /// HTTP(S) URL candidates embedded in text
    static ref HTTP_URL: Regex = Regex::new(r#"https?://[^\s<>"]+"#).expect("valid regex");
}

/// Strip all markup constructs and control characters from text.
///
/// This is the shared stripping rule: it is applied to user input and,
/// because the external engine's output is equally untrusted, to every
/// free-text field the engine returns.
pub fn strip_markup(text: &str) -> String {
    let text = EMBEDDED_BLOCK.replace_all(text, "");
    let text = MARKUP_TAG.replace_all(&text, "");

    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Text normalizer with a configurable tracking-parameter prefix set.
#[derive(Debug, Clone)]
pub struct TextSanitizer {
    tracking_prefixes: Vec<String>,
}

impl Default for TextSanitizer {
    fn default() -> Self {
        Self {
            tracking_prefixes: DEFAULT_TRACKING_PREFIXES
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }
}

impl TextSanitizer {
    /// Create a normalizer with the default tracking-prefix set
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tracking-parameter prefix set
    pub fn with_tracking_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.tracking_prefixes = prefixes;
        self
    }

    /// Normalize raw text: strip markup and control characters, rewrite
    /// URLs, trim surrounding whitespace. Never fails.
    pub fn sanitize(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }

        let text = strip_markup(text);
        let text = self.rewrite_urls(&text);
        text.trim().to_string()
    }

    /// Rewrite every HTTP(S) URL in the text to remove tracking
    /// parameters and fragments.
    fn rewrite_urls(&self, text: &str) -> String {
        HTTP_URL
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let raw = &caps[0];
                self.clean_url(raw).unwrap_or_else(|| raw.to_string())
            })
            .into_owned()
    }

    /// Parse one URL and reassemble it without tracking parameters or a
    /// fragment. `None` when the URL does not parse.
    fn clean_url(&self, raw: &str) -> Option<String> {
        let mut url = Url::parse(raw).ok()?;

        if let Some(query) = url.query() {
            // Filter on the raw pairs so percent-encoding is preserved
            let kept: Vec<&str> = query
                .split('&')
                .filter(|pair| {
                    !self
                        .tracking_prefixes
                        .iter()
                        .any(|prefix| pair.starts_with(prefix.as_str()))
                })
                .collect();

            if kept.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&kept.join("&")));
            }
        }

        url.set_fragment(None);
        Some(url.to_string())
    }
}

/// Normalize text with the default configuration
pub fn sanitize_text(text: &str) -> String {
    TextSanitizer::new().sanitize(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_all_tags() {
        let out = sanitize_text("<b>Hello</b> <a href=\"x\">world</a>");
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn test_script_content_removed() {
        let out = sanitize_text("before<script>alert('pwned')</script>after");
        assert_eq!(out, "beforeafter");
    }

    #[test]
    fn test_style_content_removed() {
        let out = sanitize_text("a<style type=\"text/css\">p { color: red }</style>b");
        assert_eq!(out, "ab");
    }

    #[test]
    fn test_control_characters_removed() {
        let out = sanitize_text("a\u{0}b\u{1b}c\nd\te\r");
        assert_eq!(out, "abc\nd\te");
    }

    #[test]
    fn test_tracking_params_removed() {
        let out = sanitize_text("see https://example.com/page?utm_source=x&id=1#frag now");
        assert_eq!(out, "see https://example.com/page?id=1 now");
    }

    #[test]
    fn test_all_params_tracking_drops_query() {
        let out = sanitize_text("https://example.com/p?utm_source=a&fbclid=b");
        assert_eq!(out, "https://example.com/p");
    }

    #[test]
    fn test_clickid_prefix_removed() {
        let out = sanitize_text("https://example.com/p?clickid=abc&q=term");
        assert_eq!(out, "https://example.com/p?q=term");
    }

    #[test]
    fn test_fragment_always_removed() {
        let out = sanitize_text("https://example.com/doc#section-2");
        assert_eq!(out, "https://example.com/doc");
    }

    #[test]
    fn test_unparseable_url_left_unchanged() {
        // Parses as a scheme but not as a valid host; must pass through
        let input = "http://[invalid";
        let out = sanitize_text(input);
        assert_eq!(out, input);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize_text(""), "");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(sanitize_text("  hello  "), "hello");
    }

    #[test]
    fn test_custom_tracking_prefixes() {
        let sanitizer =
            TextSanitizer::new().with_tracking_prefixes(vec!["ref_".to_string()]);
        let out = sanitizer.sanitize("https://example.com/p?ref_src=tw&utm_source=x");
        // utm_ no longer in the prefix set, ref_ is
        assert_eq!(out, "https://example.com/p?utm_source=x");
    }

    #[test]
    fn test_multiple_urls_rewritten() {
        let out = sanitize_text(
            "https://a.example/x?utm_a=1 and https://b.example/y?id=2&utm_b=3",
        );
        assert_eq!(out, "https://a.example/x and https://b.example/y?id=2");
    }
}
