//! # ScamShield - Fail-Closed Scam Scanning Kernel
//!
//! Scans untrusted user-submitted text or images and returns a risk
//! verdict (safe/suspicious/scam) with a numeric score, reasoning,
//! advice, and indicator labels. Built to sit behind a public endpoint
//! where input is adversarial by default - including the output of the
//! external analysis engine, which is parsed strictly and re-sanitized
//! before it can reach a caller.
//!
//! ## Pipeline
//!
//! ```text
//! raw text ----> Text Normalizer ----> Heuristic Engine --+
//!                     |                                    |
//!                     +------------------+                 v
//!                                        |              merge ----> ScanVerdict
//! raw image ---> Image Normalizer -------+--> External    ^
//!                (decode + re-encode)         Analysis ---+
//!                                             Adapter
//! ```
//!
//! Data flows strictly downward; every stage treats its input as
//! hostile, and every failure degrades to a conservative verdict rather
//! than an error. The only error a caller ever sees is the explicit
//! oversized-payload rejection.
//!
//! ## Fail-closed ladder
//!
//! | Failure                              | Resolution                        |
//! |--------------------------------------|-----------------------------------|
//! | Text over the size cap               | Explicit rejection (no verdict)   |
//! | Image fails decode/re-encode         | Top-level fail-closed verdict     |
//! | Engine timeout / malformed response  | Adapter canned result (susp./50)  |
//! | Anything else                        | Top-level fail-closed verdict     |
//!
//! ## Quick Start
//!
//! ### Scanning text
//!
//! ```rust,ignore
//! use scamshield::{Config, ScanRequest, Scanner};
//!
//! let scanner = Scanner::new(Config::from_env())?;
//!
//! let verdict = scanner
//!     .scan(ScanRequest {
//!         text: Some("URGENT: verify your account now".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("{} ({})", verdict.verdict, verdict.risk_score);
//! for indicator in &verdict.indicators {
//!     println!("  - {indicator}");
//! }
//! ```
//!
//! ### Heuristics only (no network)
//!
//! ```rust,ignore
//! use scamshield::HeuristicEngine;
//!
//! let engine = HeuristicEngine::default();
//! let result = engine.evaluate("You won the lottery! Login here");
//! assert!(result.score > 0);
//! ```
//!
//! ## Modules
//!
//! - [`sanitize`]: text and image normalization
//! - [`heuristics`]: deterministic pattern-weight scoring
//! - [`analysis`]: external analysis engine adapter
//! - [`scan`]: verdict orchestration and merge policy
//! - [`server`]: HTTP API server (Axum-based)
//! - [`config`]: configuration management
//! - [`error`]: error types and result aliases

pub mod analysis;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod sanitize;
pub mod scan;
pub mod server;

// Re-exports for convenience
pub use analysis::{AnalysisClient, AnalysisProfile, ExternalResult};
pub use config::{AnalysisConfig, Config, ScanLimits};
pub use error::{Result, ScanError};
pub use heuristics::{default_rules, HeuristicEngine, HeuristicResult, RuleEntry, RuleSet};
pub use sanitize::{
    reencode_image, sanitize_text, strip_markup, ContentKind, NormalizedContent, TextSanitizer,
};
pub use scan::{GroundingSource, ScanRequest, ScanVerdict, Scanner, Verdict};
pub use server::{create_router, AppState, ServerConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
