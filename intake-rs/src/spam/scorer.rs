//! Spam scoring engine
//!
//! A deterministic, rule-based scorer for public form submissions. Every
//! signal contributes a fixed weight to a running total; the total is
//! clamped to [0.0, 1.0] and compared against the configured threshold.
//! No learning, no I/O: the verdict is fully explainable from its reasons.

use regex::Regex;

use super::types::*;

const KEYWORD_WEIGHT: f64 = 0.3;
const CAPS_WEIGHT: f64 = 0.2;
const EMAIL_PATTERN_WEIGHT: f64 = 0.3;
const DISPOSABLE_DOMAIN_WEIGHT: f64 = 0.3;
const SHORT_MESSAGE_WEIGHT: f64 = 0.2;
const LONG_MESSAGE_WEIGHT: f64 = 0.1;
const REPEATED_RUN_WEIGHT: f64 = 0.2;
const URL_COUNT_WEIGHT: f64 = 0.2;

/// Uppercase ratio above which a message counts as shouting
const CAPS_RATIO_LIMIT: f64 = 0.5;
/// Caps check only applies to messages longer than this
const CAPS_MIN_LENGTH: usize = 20;
const MIN_MESSAGE_LENGTH: usize = 10;
const MAX_MESSAGE_LENGTH: usize = 2000;
/// Same character this many times in a row triggers the repeat signal
const REPEAT_RUN_LENGTH: usize = 5;
/// This many URLs in the combined text triggers the URL signal
const URL_COUNT_LIMIT: usize = 3;

/// Digit run in the email local part (e.g. "x12345678@...")
const DIGIT_RUN_PATTERN: &str = r"[0-9]{5,}";

const SUSPICIOUS_TLDS: &[&str] = &["tk", "ml", "ga", "cf"];

const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail",
    "guerrillamail",
    "10minutemail",
    "mailinator",
];

/// Spam scorer engine
pub struct SpamScorer {
    config: ScorerConfig,
}

impl SpamScorer {
    /// Create a new spam scorer
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Get current config
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score a form submission.
    ///
    /// Pure and total over string input: empty strings are valid and
    /// simply trigger whatever signals they trigger (an empty message
    /// counts as "too short"). Each triggered signal adds its weight and
    /// appends one reason; the final score is clamped at 1.0.
    pub fn score(&self, submission: &FormSubmission) -> SpamVerdict {
        let mut total = 0.0;
        let mut reasons = Vec::new();

        // Keyword, repeat and URL checks all run against the lower-cased
        // combined text so the signals stay case-insensitive together.
        let combined = combined_text(submission);
        let email = submission.email.to_lowercase();
        let message_len = submission.message.chars().count();

        for list in self.config.preset.keyword_lists() {
            for keyword in *list {
                if combined.contains(keyword) {
                    total += KEYWORD_WEIGHT;
                    reasons.push(format!("Message contains spam keyword \"{}\"", keyword));
                }
            }
        }

        if excessive_caps(&submission.message) {
            total += CAPS_WEIGHT;
            reasons.push("Message is mostly uppercase".to_string());
        }

        if has_digit_run(&email) {
            total += EMAIL_PATTERN_WEIGHT;
            reasons.push("Email local part contains a long digit run".to_string());
        }

        if let Some(tld) = suspicious_tld(&email) {
            total += EMAIL_PATTERN_WEIGHT;
            reasons.push(format!("Email uses suspicious top-level domain \"{}\"", tld));
        }

        if let Some(provider) = disposable_domain(&email) {
            total += DISPOSABLE_DOMAIN_WEIGHT;
            reasons.push(format!(
                "Email domain matches disposable provider \"{}\"",
                provider
            ));
        }

        if message_len < MIN_MESSAGE_LENGTH {
            total += SHORT_MESSAGE_WEIGHT;
            reasons.push("Message is too short".to_string());
        }

        if message_len > MAX_MESSAGE_LENGTH {
            total += LONG_MESSAGE_WEIGHT;
            reasons.push("Message is too long".to_string());
        }

        if has_repeated_run(&combined) {
            total += REPEATED_RUN_WEIGHT;
            reasons.push("Message repeats the same character".to_string());
        }

        let urls = url_count(&combined);
        if urls >= URL_COUNT_LIMIT {
            total += URL_COUNT_WEIGHT;
            reasons.push(format!("Message contains {} URLs", urls));
        }

        // Weights are all positive, so only the upper bound needs clamping
        let score = total.min(1.0);

        SpamVerdict {
            is_spam: score >= self.config.spam_threshold,
            score,
            reasons,
        }
    }
}

impl Default for SpamScorer {
    fn default() -> Self {
        Self::new(ScorerConfig::default())
    }
}

/// Lower-cased concatenation of every free-text field in the submission
fn combined_text(submission: &FormSubmission) -> String {
    let mut text = format!(
        "{} {} {}",
        submission.name,
        submission.message,
        submission.company_name.as_deref().unwrap_or("")
    );
    if let Some(exhibition) = &submission.exhibition_name {
        text.push(' ');
        text.push_str(exhibition);
    }
    text.to_lowercase()
}

/// Uppercase-letter ratio over the whole message, for messages past the
/// minimum length. Applied to the raw message, not the combined text.
fn excessive_caps(message: &str) -> bool {
    let len = message.chars().count();
    if len <= CAPS_MIN_LENGTH {
        return false;
    }

    let uppercase = message.chars().filter(|c| c.is_uppercase()).count();
    uppercase as f64 / len as f64 > CAPS_RATIO_LIMIT
}

/// 5+ consecutive digits in the local part of the address
fn has_digit_run(email: &str) -> bool {
    let local = match email.split('@').next() {
        Some(local) => local,
        None => return false,
    };

    if let Ok(re) = Regex::new(DIGIT_RUN_PATTERN) {
        re.is_match(local)
    } else {
        false
    }
}

/// TLD check against the throwaway-registrar list. Domains without a dot
/// are treated as bare TLDs (e.g. "x@tk").
fn suspicious_tld(email: &str) -> Option<&'static str> {
    let domain = email.split('@').nth(1)?;
    let tld = domain.rsplit('.').next()?;
    SUSPICIOUS_TLDS.iter().copied().find(|t| *t == tld)
}

/// Substring check against known disposable-mail providers
fn disposable_domain(email: &str) -> Option<&'static str> {
    let domain = email.split('@').nth(1)?;
    DISPOSABLE_DOMAINS.iter().copied().find(|d| domain.contains(d))
}

/// Same character repeated REPEAT_RUN_LENGTH or more times in a row.
/// The regex crate has no backreferences, so this is a direct scan.
fn has_repeated_run(text: &str) -> bool {
    let mut run = 1;
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if prev == Some(c) {
            run += 1;
            if run >= REPEAT_RUN_LENGTH {
                return true;
            }
        } else {
            run = 1;
            prev = Some(c);
        }
    }

    false
}

/// Count of http:// and https:// occurrences
fn url_count(text: &str) -> usize {
    text.matches("http://").count() + text.matches("https://").count()
}
