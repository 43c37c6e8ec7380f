//! Submission persistence module
//!
//! Stores scored submissions and serves the admin review API.

pub mod store;
pub mod types;

pub use store::SubmissionStore;
pub use types::*;
