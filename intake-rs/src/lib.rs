//! intake-rs: Form intake service with heuristic spam scoring
//!
//! An HTTP intake service for a marketing website's public forms. Each
//! submission is validated, scored by a deterministic rule-based spam
//! heuristic, persisted with its verdict, and relayed onward only when it
//! is not spam.
//!
//! # Features
//!
//! - **Spam scoring**: Explainable, rule-based scoring in [0.0, 1.0]
//! - **Intake API**: Contact and event enquiry form endpoints
//! - **Review API**: List, inspect and re-classify stored submissions
//! - **Notifications**: Best-effort webhook relay for non-spam submissions
//!
//! # Example
//!
//! ```
//! use intake_rs::spam::{FormSubmission, SpamScorer};
//!
//! let scorer = SpamScorer::default();
//! let verdict = scorer.score(&FormSubmission {
//!     name: "John Smith".to_string(),
//!     email: "john@example.com".to_string(),
//!     message: "I would like a quote for a 6x6 booth.".to_string(),
//!     company_name: None,
//!     exhibition_name: None,
//! });
//!
//! assert!(!verdict.is_spam);
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`spam`]: The spam scoring engine
//! - [`submissions`]: Submission persistence
//! - [`api`]: HTTP API (intake + admin review)
//! - [`notify`]: Outbound notification seam
//! - [`utils`]: Utility functions (validation, etc.)

pub mod api;
pub mod config;
pub mod error;
pub mod notify;
pub mod spam;
pub mod submissions;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{IntakeError, Result};
