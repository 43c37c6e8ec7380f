//! API request handlers
//!
//! Public form intake plus the admin review endpoints. Each form handler
//! validates the request, scores it, persists it with the verdict, and
//! only then decides whether to dispatch the outbound notification. The
//! whole sequence runs synchronously within the request.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::IntakeError;
use crate::notify::Notifier;
use crate::spam::{FormSubmission, SpamScorer, SpamVerdict};
use crate::submissions::{
    FormKind, StoredSubmission, SubmissionFilter, SubmissionStats, SubmissionStatus,
    SubmissionStore,
};
use crate::utils::{validate_email, validate_required};

/// Shared application state
pub struct AppState {
    pub store: SubmissionStore,
    pub contact_scorer: SpamScorer,
    pub event_scorer: SpamScorer,
    pub notifier: Arc<dyn Notifier>,
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

/// Contact form request body
#[derive(Debug, Deserialize)]
pub struct ContactFormRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    pub company_name: Option<String>,
}

/// Event enquiry form request body
#[derive(Debug, Deserialize)]
pub struct EventFormRequest {
    pub name: String,
    pub email: String,
    pub message: String,
    pub company_name: Option<String>,
    pub exhibition_name: Option<String>,
}

/// Acknowledgement returned to the submitter. The verdict is deliberately
/// not included; spam and ham get the same answer.
#[derive(Debug, Serialize)]
pub struct SubmissionAck {
    pub id: String,
}

/// Status change request
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Dry-run scoring request (admin tooling)
#[derive(Debug, Deserialize)]
pub struct TestScoreRequest {
    pub kind: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub company_name: Option<String>,
    pub exhibition_name: Option<String>,
}

/// Stored submission as exposed by the admin API, with the reasons
/// decoded back into an array for display.
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: String,
    pub kind: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub company_name: Option<String>,
    pub exhibition_name: Option<String>,
    pub is_spam: bool,
    pub spam_score: f64,
    pub spam_reasons: Vec<String>,
    pub status: String,
    pub created_at: String,
}

impl From<StoredSubmission> for SubmissionResponse {
    fn from(s: StoredSubmission) -> Self {
        let spam_reasons = serde_json::from_str(&s.spam_reasons).unwrap_or_default();
        Self {
            id: s.id,
            kind: s.kind.as_str().to_string(),
            name: s.name,
            email: s.email,
            message: s.message,
            company_name: s.company_name,
            exhibition_name: s.exhibition_name,
            is_spam: s.is_spam,
            spam_score: s.spam_score,
            spam_reasons,
            status: s.status.as_str().to_string(),
            created_at: s.created_at.to_rfc3339(),
        }
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::success("ok"))
}

/// POST /api/forms/contact
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContactFormRequest>,
) -> impl IntoResponse {
    let submission = FormSubmission {
        name: req.name,
        email: req.email,
        message: req.message,
        company_name: req.company_name,
        exhibition_name: None,
    };

    handle_form(&state, FormKind::Contact, submission).await
}

/// POST /api/forms/event
pub async fn submit_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EventFormRequest>,
) -> impl IntoResponse {
    let submission = FormSubmission {
        name: req.name,
        email: req.email,
        message: req.message,
        company_name: req.company_name,
        exhibition_name: req.exhibition_name,
    };

    handle_form(&state, FormKind::Event, submission).await
}

/// Shared intake sequence: validate, score, persist, then gate the
/// notification on the verdict.
async fn handle_form(
    state: &AppState,
    kind: FormKind,
    submission: FormSubmission,
) -> axum::response::Response {
    if let Err(e) = validate_form(&submission) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<SubmissionAck>::error(&e.to_string())),
        )
            .into_response();
    }

    let scorer = match kind {
        FormKind::Contact => &state.contact_scorer,
        FormKind::Event => &state.event_scorer,
    };
    let verdict = scorer.score(&submission);

    let stored = match state.store.insert(kind, &submission, &verdict).await {
        Ok(stored) => stored,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<SubmissionAck>::error(&format!(
                    "Failed to store submission: {}",
                    e
                ))),
            )
                .into_response();
        }
    };

    info!(
        "Stored {} submission {} (score {:.2}, spam: {})",
        kind.as_str(),
        stored.id,
        verdict.score,
        verdict.is_spam
    );

    if !verdict.is_spam {
        state.notifier.notify(&stored).await;
    }

    Json(ApiResponse::success(SubmissionAck { id: stored.id })).into_response()
}

/// Required-field and email-shape checks, before the pure scoring call
fn validate_form(submission: &FormSubmission) -> crate::error::Result<()> {
    validate_required("name", &submission.name)?;
    validate_required("email", &submission.email)?;
    validate_required("message", &submission.message)?;
    validate_email(&submission.email)?;
    Ok(())
}

/// GET /api/submissions?kind=&status=&limit=
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut filter = SubmissionFilter::default();

    if let Some(kind) = params.get("kind") {
        match FormKind::parse(kind) {
            Some(kind) => filter.kind = Some(kind),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::<Vec<SubmissionResponse>>::error(&format!(
                        "Unknown form kind: {}",
                        kind
                    ))),
                )
                    .into_response();
            }
        }
    }

    if let Some(status) = params.get("status") {
        match SubmissionStatus::parse(status) {
            Some(status) => filter.status = Some(status),
            None => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::<Vec<SubmissionResponse>>::error(&format!(
                        "Unknown status: {}",
                        status
                    ))),
                )
                    .into_response();
            }
        }
    }

    filter.limit = params.get("limit").and_then(|s| s.parse().ok());

    match state.store.list(&filter).await {
        Ok(submissions) => {
            let response: Vec<SubmissionResponse> =
                submissions.into_iter().map(|s| s.into()).collect();
            Json(ApiResponse::success(response)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<Vec<SubmissionResponse>>::error(&format!(
                "Failed to list submissions: {}",
                e
            ))),
        )
            .into_response(),
    }
}

/// GET /api/submissions/:id
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&id).await {
        Ok(Some(submission)) => {
            Json(ApiResponse::success(SubmissionResponse::from(submission))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<SubmissionResponse>::error("Submission not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<SubmissionResponse>::error(&format!(
                "Failed to get submission: {}",
                e
            ))),
        )
            .into_response(),
    }
}

/// PUT /api/submissions/:id/status
pub async fn update_submission_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> impl IntoResponse {
    let status = match SubmissionStatus::parse(&req.status) {
        Some(status) => status,
        None => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<SubmissionResponse>::error(&format!(
                    "Unknown status: {}",
                    req.status
                ))),
            )
                .into_response();
        }
    };

    match state.store.update_status(&id, status).await {
        Ok(updated) => {
            Json(ApiResponse::success(SubmissionResponse::from(updated))).into_response()
        }
        Err(IntakeError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<SubmissionResponse>::error("Submission not found")),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<SubmissionResponse>::error(&format!(
                "Failed to update submission: {}",
                e
            ))),
        )
            .into_response(),
    }
}

/// POST /api/spam/test - dry-run the scorer without persisting anything
pub async fn test_score(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TestScoreRequest>,
) -> impl IntoResponse {
    let kind = match FormKind::parse(&req.kind) {
        Some(kind) => kind,
        None => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<SpamVerdict>::error(&format!(
                    "Unknown form kind: {}",
                    req.kind
                ))),
            )
                .into_response();
        }
    };

    let submission = FormSubmission {
        name: req.name,
        email: req.email,
        message: req.message,
        company_name: req.company_name,
        exhibition_name: req.exhibition_name,
    };

    let scorer = match kind {
        FormKind::Contact => &state.contact_scorer,
        FormKind::Event => &state.event_scorer,
    };

    Json(ApiResponse::success(scorer.score(&submission))).into_response()
}

/// GET /api/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.stats().await {
        Ok(stats) => Json(ApiResponse::success(stats)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<SubmissionStats>::error(&format!(
                "Failed to get stats: {}",
                e
            ))),
        )
            .into_response(),
    }
}
