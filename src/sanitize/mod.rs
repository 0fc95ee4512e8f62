//! Input normalization.
//!
//! Reduces untrusted input to a canonical, stripped form before any
//! analysis runs:
//! - Text: markup and control characters removed, tracking parameters
//!   stripped from URLs. Best-effort, never fails.
//! - Images: decoded, size-bounded, and re-encoded to canonical JPEG so
//!   the output byte stream is always freshly generated pixel data.

mod image;
mod text;

pub use image::{reencode_image, JPEG_QUALITY, MAX_IMAGE_BYTES};
pub use text::{sanitize_text, strip_markup, TextSanitizer};

/// Content after normalization, ready for analysis.
#[derive(Debug, Clone)]
pub enum NormalizedContent {
    /// Sanitized plain text
    Text(String),
    /// Re-encoded canonical JPEG bytes
    Image(Vec<u8>),
}

impl NormalizedContent {
    /// The kind of content carried
    pub fn kind(&self) -> ContentKind {
        match self {
            NormalizedContent::Text(_) => ContentKind::Text,
            NormalizedContent::Image(_) => ContentKind::Image,
        }
    }
}

/// Kind of content flowing through the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Plain text
    Text,
    /// Image bytes
    Image,
}
