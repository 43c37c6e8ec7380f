//! Submission types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which public form produced a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormKind {
    /// General contact form
    Contact,
    /// Event/exhibition enquiry form
    Event,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contact => "Contact",
            FormKind::Event => "Event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Contact" => Some(FormKind::Contact),
            "Event" => Some(FormKind::Event),
            _ => None,
        }
    }
}

/// Review state of a stored submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Accepted, awaiting review
    New,
    /// Classified as spam (by the scorer or by an admin)
    Spam,
    /// Reviewed and confirmed legitimate
    Reviewed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::New => "New",
            SubmissionStatus::Spam => "Spam",
            SubmissionStatus::Reviewed => "Reviewed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "New" => Some(SubmissionStatus::New),
            "Spam" => Some(SubmissionStatus::Spam),
            "Reviewed" => Some(SubmissionStatus::Reviewed),
            _ => None,
        }
    }
}

/// A persisted form submission, including its spam verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSubmission {
    /// Unique ID
    pub id: String,
    /// Originating form
    pub kind: FormKind,
    pub name: String,
    pub email: String,
    pub message: String,
    pub company_name: Option<String>,
    pub exhibition_name: Option<String>,
    /// Verdict at submission time
    pub is_spam: bool,
    /// Score at submission time, in [0.0, 1.0]
    pub spam_score: f64,
    /// Triggered signal reasons, JSON-encoded string array
    pub spam_reasons: String,
    /// Review state
    pub status: SubmissionStatus,
    /// Timestamp
    pub created_at: DateTime<Utc>,
}

/// List filter for the admin review API
#[derive(Debug, Clone, Default)]
pub struct SubmissionFilter {
    pub kind: Option<FormKind>,
    pub status: Option<SubmissionStatus>,
    pub limit: Option<i64>,
}

/// Aggregate counters for the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionStats {
    pub total: u64,
    pub spam: u64,
    pub pending_review: u64,
    pub contact: u64,
    pub event: u64,
}
