//! Spam scoring types and data structures

use serde::{Deserialize, Serialize};

/// A form submission as scored by the spam heuristic.
///
/// Required fields are validated at the API boundary before scoring;
/// empty strings are valid input here, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSubmission {
    /// Sender name
    pub name: String,
    /// Sender email address
    pub email: String,
    /// Free-text message body
    pub message: String,
    /// Optional company name
    pub company_name: Option<String>,
    /// Optional exhibition/event name (event enquiry form only)
    pub exhibition_name: Option<String>,
}

/// Spam scoring verdict
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpamVerdict {
    /// Is this submission spam (score >= threshold)
    pub is_spam: bool,
    /// Total spam score, clamped to [0.0, 1.0]
    pub score: f64,
    /// Human-readable explanation of each triggered signal, in
    /// evaluation order. Duplicates are kept, not merged.
    pub reasons: Vec<String>,
}

/// Keyword list preset, one per public form.
///
/// The two forms historically carried different keyword lists; they are
/// kept as presets over a single shared weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeywordPreset {
    /// General contact form keyword list
    Contact,
    /// Event enquiry form: contact list plus diet/crypto bait terms
    Event,
}

/// Base keyword list shared by both forms
const CONTACT_KEYWORDS: &[&str] = &[
    "viagra",
    "casino",
    "lottery",
    "winner",
    "congratulations",
    "click here",
    "free money",
    "make money fast",
    "work from home",
    "guaranteed",
    "no risk",
    "limited time",
    "act now",
];

/// Additional keywords checked only by the event enquiry form
const EVENT_EXTRA_KEYWORDS: &[&str] = &[
    "weight loss",
    "lose weight",
    "diet pills",
    "crypto",
    "bitcoin",
];

impl KeywordPreset {
    /// Keyword lists to match against the combined submission text.
    ///
    /// Returned as slices rather than a flattened Vec so the scorer can
    /// iterate without allocating.
    pub fn keyword_lists(&self) -> &'static [&'static [&'static str]] {
        match self {
            KeywordPreset::Contact => &[CONTACT_KEYWORDS],
            KeywordPreset::Event => &[CONTACT_KEYWORDS, EVENT_EXTRA_KEYWORDS],
        }
    }
}

/// Scorer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Score at or above which a submission is classified as spam
    pub spam_threshold: f64,
    /// Which keyword preset to match against
    pub preset: KeywordPreset,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            spam_threshold: 0.5,
            preset: KeywordPreset::Contact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_preset_includes_contact_keywords() {
        let lists = KeywordPreset::Event.keyword_lists();
        assert_eq!(lists.len(), 2);
        assert!(lists[0].contains(&"free money"));
        assert!(lists[1].contains(&"bitcoin"));
    }

    #[test]
    fn test_contact_preset_excludes_event_keywords() {
        let lists = KeywordPreset::Contact.keyword_lists();
        assert_eq!(lists.len(), 1);
        assert!(!lists[0].contains(&"crypto"));
    }

    #[test]
    fn test_default_threshold() {
        let config = ScorerConfig::default();
        assert_eq!(config.spam_threshold, 0.5);
    }
}
