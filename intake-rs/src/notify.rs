//! Outbound notification seam
//!
//! Non-spam submissions are relayed to a configured webhook so the sales
//! team hears about them. The relay is best-effort: the submission is
//! already persisted when the notification fires, so a relay failure is
//! logged and swallowed rather than failing the request.

use axum::async_trait;
use tracing::{info, warn};

use crate::submissions::StoredSubmission;

/// Notification dispatch for accepted (non-spam) submissions
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &StoredSubmission);
}

/// Posts the stored submission as JSON to a relay endpoint
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, submission: &StoredSubmission) {
        match self.client.post(&self.url).json(submission).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Notified relay about submission {}", submission.id);
            }
            Ok(response) => {
                warn!(
                    "Relay rejected notification for submission {}: {}",
                    submission.id,
                    response.status()
                );
            }
            Err(e) => {
                warn!(
                    "Failed to notify relay about submission {}: {}",
                    submission.id, e
                );
            }
        }
    }
}

/// Used when no webhook is configured
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, submission: &StoredSubmission) {
        info!(
            "No relay configured, skipping notification for submission {}",
            submission.id
        );
    }
}
