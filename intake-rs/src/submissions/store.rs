//! Submission store
//!
//! Persists form submissions together with the spam verdict computed at
//! intake time, and backs the admin review API.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{IntakeError, Result};
use crate::spam::{FormSubmission, SpamVerdict};

use super::types::*;

/// Submission store over SQLite
pub struct SubmissionStore {
    db: SqlitePool,
}

impl SubmissionStore {
    /// Create a new submission store
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Initialize database tables
    pub async fn init_db(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS form_submissions (
                id TEXT PRIMARY KEY,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                company_name TEXT,
                exhibition_name TEXT,
                is_spam INTEGER NOT NULL,
                spam_score REAL NOT NULL,
                spam_reasons TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Insert a scored submission. The verdict decides the initial status:
    /// spam goes straight to the Spam state, everything else starts as New.
    pub async fn insert(
        &self,
        kind: FormKind,
        submission: &FormSubmission,
        verdict: &SpamVerdict,
    ) -> Result<StoredSubmission> {
        let id = Uuid::new_v4().to_string();
        let status = if verdict.is_spam {
            SubmissionStatus::Spam
        } else {
            SubmissionStatus::New
        };
        let created_at = Utc::now();
        let reasons_json = serde_json::to_string(&verdict.reasons)?;

        sqlx::query(
            r#"
            INSERT INTO form_submissions
                (id, kind, name, email, message, company_name, exhibition_name,
                 is_spam, spam_score, spam_reasons, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(kind.as_str())
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(&submission.message)
        .bind(&submission.company_name)
        .bind(&submission.exhibition_name)
        .bind(verdict.is_spam as i64)
        .bind(verdict.score)
        .bind(&reasons_json)
        .bind(status.as_str())
        .bind(created_at.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(StoredSubmission {
            id,
            kind,
            name: submission.name.clone(),
            email: submission.email.clone(),
            message: submission.message.clone(),
            company_name: submission.company_name.clone(),
            exhibition_name: submission.exhibition_name.clone(),
            is_spam: verdict.is_spam,
            spam_score: verdict.score,
            spam_reasons: reasons_json,
            status,
            created_at,
        })
    }

    /// Get a submission by ID
    pub async fn get(&self, id: &str) -> Result<Option<StoredSubmission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            "SELECT id, kind, name, email, message, company_name, exhibition_name, is_spam, spam_score, spam_reasons, status, created_at FROM form_submissions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(SubmissionRow::into_submission).transpose()
    }

    /// List submissions, newest first
    pub async fn list(&self, filter: &SubmissionFilter) -> Result<Vec<StoredSubmission>> {
        // Negative LIMIT means "no limit" to SQLite, so clamp it out
        let limit = filter.limit.unwrap_or(100).max(0);

        let rows = match (filter.kind, filter.status) {
            (Some(kind), Some(status)) => {
                sqlx::query_as::<_, SubmissionRow>(
                    "SELECT id, kind, name, email, message, company_name, exhibition_name, is_spam, spam_score, spam_reasons, status, created_at FROM form_submissions WHERE kind = ? AND status = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(status.as_str())
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
            (Some(kind), None) => {
                sqlx::query_as::<_, SubmissionRow>(
                    "SELECT id, kind, name, email, message, company_name, exhibition_name, is_spam, spam_score, spam_reasons, status, created_at FROM form_submissions WHERE kind = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(kind.as_str())
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
            (None, Some(status)) => {
                sqlx::query_as::<_, SubmissionRow>(
                    "SELECT id, kind, name, email, message, company_name, exhibition_name, is_spam, spam_score, spam_reasons, status, created_at FROM form_submissions WHERE status = ? ORDER BY created_at DESC LIMIT ?",
                )
                .bind(status.as_str())
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, SubmissionRow>(
                    "SELECT id, kind, name, email, message, company_name, exhibition_name, is_spam, spam_score, spam_reasons, status, created_at FROM form_submissions ORDER BY created_at DESC LIMIT ?",
                )
                .bind(limit)
                .fetch_all(&self.db)
                .await?
            }
        };

        rows.into_iter()
            .map(SubmissionRow::into_submission)
            .collect()
    }

    /// Re-classify a submission from the admin side
    pub async fn update_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<StoredSubmission> {
        let result = sqlx::query("UPDATE form_submissions SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(IntakeError::NotFound(format!("submission {}", id)));
        }

        self.get(id)
            .await?
            .ok_or_else(|| IntakeError::NotFound(format!("submission {}", id)))
    }

    /// Aggregate counters for the admin dashboard
    pub async fn stats(&self) -> Result<SubmissionStats> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM form_submissions")
            .fetch_one(&self.db)
            .await?;

        let (spam,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM form_submissions WHERE status = 'Spam'")
                .fetch_one(&self.db)
                .await?;

        let (pending_review,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM form_submissions WHERE status = 'New'")
                .fetch_one(&self.db)
                .await?;

        let (contact,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM form_submissions WHERE kind = 'Contact'")
                .fetch_one(&self.db)
                .await?;

        let (event,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM form_submissions WHERE kind = 'Event'")
                .fetch_one(&self.db)
                .await?;

        Ok(SubmissionStats {
            total: total as u64,
            spam: spam as u64,
            pending_review: pending_review as u64,
            contact: contact as u64,
            event: event as u64,
        })
    }
}

/// Raw row shape, decoded into a StoredSubmission
#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    kind: String,
    name: String,
    email: String,
    message: String,
    company_name: Option<String>,
    exhibition_name: Option<String>,
    is_spam: i64,
    spam_score: f64,
    spam_reasons: String,
    status: String,
    created_at: String,
}

impl SubmissionRow {
    fn into_submission(self) -> Result<StoredSubmission> {
        let kind = FormKind::parse(&self.kind)
            .ok_or_else(|| IntakeError::Parse(format!("unknown form kind: {}", self.kind)))?;
        let status = SubmissionStatus::parse(&self.status)
            .ok_or_else(|| IntakeError::Parse(format!("unknown status: {}", self.status)))?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| IntakeError::Parse(e.to_string()))?
            .with_timezone(&Utc);

        Ok(StoredSubmission {
            id: self.id,
            kind,
            name: self.name,
            email: self.email,
            message: self.message,
            company_name: self.company_name,
            exhibition_name: self.exhibition_name,
            is_spam: self.is_spam != 0,
            spam_score: self.spam_score,
            spam_reasons: self.spam_reasons,
            status,
            created_at,
        })
    }
}
