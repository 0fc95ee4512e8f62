//! External analysis engine adapter.
//!
//! Invokes the non-deterministic analysis engine on normalized content
//! and treats everything it returns as untrusted: the response is parsed
//! strictly, re-sanitized, and any anomaly - network failure, timeout,
//! malformed JSON, unknown verdict label - collapses to a canned
//! fail-closed result. Nothing in this module can raise past its
//! boundary.

mod adapter;
mod profile;

pub use adapter::{
    AnalysisClient, ExternalResult, FAILSAFE_ADVICE, FAILSAFE_INDICATOR, FAILSAFE_REASONING,
};
pub use profile::AnalysisProfile;
