//! Spam scoring module
//!
//! Deterministic rule-based spam detection for public form submissions.

pub mod scorer;
pub mod types;

pub use scorer::SpamScorer;
pub use types::*;
