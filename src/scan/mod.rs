//! Scan orchestration.
//!
//! The top-level entry point: sequences normalization, heuristics, and
//! external analysis, merges the two signals, and guarantees that every
//! scan resolves to a well-formed verdict. This is the only component
//! permitted to catch broad failures.

mod pipeline;
mod verdict;

pub use pipeline::{ScanRequest, Scanner};
pub use verdict::{GroundingSource, ScanVerdict, Verdict};
