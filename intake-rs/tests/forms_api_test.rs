//! Integration tests for the form intake and admin review API

use axum::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use intake_rs::api::server::ApiServer;
use intake_rs::api::AppState;
use intake_rs::notify::Notifier;
use intake_rs::spam::{KeywordPreset, ScorerConfig, SpamScorer};
use intake_rs::submissions::{StoredSubmission, SubmissionStore};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

/// Records which submissions were notified instead of calling out
struct RecordingNotifier {
    notified: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, submission: &StoredSubmission) {
        self.notified.lock().await.push(submission.id.clone());
    }
}

async fn test_app(rate_limit: u32) -> (Router, Arc<Mutex<Vec<String>>>) {
    let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
    let store = SubmissionStore::new(pool);
    store.init_db().await.unwrap();

    let notified = Arc::new(Mutex::new(Vec::new()));
    let notifier = Arc::new(RecordingNotifier {
        notified: notified.clone(),
    });

    let state = Arc::new(AppState {
        store,
        contact_scorer: SpamScorer::new(ScorerConfig {
            spam_threshold: 0.5,
            preset: KeywordPreset::Contact,
        }),
        event_scorer: SpamScorer::new(ScorerConfig {
            spam_threshold: 0.5,
            preset: KeywordPreset::Event,
        }),
        notifier,
    });

    let server = ApiServer::new(state, rate_limit, "127.0.0.1:0".to_string());
    (server.router(), notified)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn clean_contact_body() -> Value {
    json!({
        "name": "John Smith",
        "email": "john@example.com",
        "message": "I would like a quote for a 6x6 booth at GITEX next year, budget around $10k."
    })
}

fn spam_contact_body() -> Value {
    json!({
        "name": "WINNER",
        "email": "x12345678@tk",
        "message": "CLICK HERE FREE MONEY GUARANTEED NO RISK!!!"
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(100).await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_clean_contact_submission_is_stored_and_notified() {
    let (app, notified) = test_app(100).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/contact", clean_contact_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    // Stored as New with a zero score
    let response = app
        .clone()
        .oneshot(get(&format!("/api/submissions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("New"));
    assert_eq!(body["data"]["is_spam"], json!(false));
    assert_eq!(body["data"]["spam_score"], json!(0.0));
    assert_eq!(body["data"]["spam_reasons"], json!([]));

    // Non-spam submissions trigger the notifier
    assert_eq!(notified.lock().await.as_slice(), &[id]);
}

#[tokio::test]
async fn test_spam_submission_is_quarantined_and_not_notified() {
    let (app, notified) = test_app(100).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/contact", spam_contact_body()))
        .await
        .unwrap();
    // Spammers get the same acknowledgement as everyone else
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let id = body["data"]["id"].as_str().unwrap();

    let response = app
        .clone()
        .oneshot(get(&format!("/api/submissions/{}", id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("Spam"));
    assert_eq!(body["data"]["is_spam"], json!(true));
    assert_eq!(body["data"]["spam_score"], json!(1.0));
    assert!(body["data"]["spam_reasons"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r.as_str().unwrap().contains("free money")));

    assert!(notified.lock().await.is_empty());
}

#[tokio::test]
async fn test_event_form_uses_event_keyword_preset() {
    let (app, _) = test_app(100).await;

    let body = json!({
        "name": "Promo Bot",
        "email": "bot@example.com",
        "message": "Earn bitcoin with crypto signals, lose weight fast too!",
        "exhibition_name": "GITEX"
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/event", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(get(&format!("/api/submissions/{}", id)))
        .await
        .unwrap();
    let body = body_json(response).await;
    // bitcoin + crypto + lose weight = 0.9 >= 0.5
    assert_eq!(body["data"]["status"], json!("Spam"));
    assert_eq!(body["data"]["kind"], json!("Event"));
    assert_eq!(body["data"]["exhibition_name"], json!("GITEX"));
}

#[tokio::test]
async fn test_missing_required_field_is_rejected() {
    let (app, notified) = test_app(100).await;

    let body = json!({
        "name": "John Smith",
        "email": "john@example.com",
        "message": "   "
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/contact", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("message"));

    // Rejected submissions are neither stored nor notified
    let response = app.oneshot(get("/api/submissions")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    assert!(notified.lock().await.is_empty());
}

#[tokio::test]
async fn test_malformed_email_is_rejected() {
    let (app, _) = test_app(100).await;

    let body = json!({
        "name": "John Smith",
        "email": "not-an-email",
        "message": "Please send me a brochure for your stands."
    });

    let response = app
        .oneshot(post_json("/api/forms/contact", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_list_submissions_with_filters() {
    let (app, _) = test_app(100).await;

    app.clone()
        .oneshot(post_json("/api/forms/contact", clean_contact_body()))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/api/forms/contact", spam_contact_body()))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/api/submissions?status=Spam"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get("/api/submissions?kind=Event"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let response = app
        .clone()
        .oneshot(get("/api/submissions?limit=-1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let response = app
        .oneshot(get("/api/submissions?status=Bogus"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_review_status_update() {
    let (app, _) = test_app(100).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/contact", clean_contact_body()))
        .await
        .unwrap();
    let id = body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/api/submissions/{}/status", id),
            json!({"status": "Reviewed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], json!("Reviewed"));

    let response = app
        .oneshot(put_json(
            "/api/submissions/no-such-id/status",
            json!({"status": "Spam"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_unknown_submission_is_404() {
    let (app, _) = test_app(100).await;

    let response = app
        .oneshot(get("/api/submissions/does-not-exist"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dry_run_scoring_does_not_persist() {
    let (app, _) = test_app(100).await;

    let body = json!({
        "kind": "Contact",
        "name": "WINNER",
        "email": "x12345678@tk",
        "message": "CLICK HERE FREE MONEY GUARANTEED NO RISK!!!"
    });

    let response = app
        .clone()
        .oneshot(post_json("/api/spam/test", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["is_spam"], json!(true));
    assert_eq!(body["data"]["score"], json!(1.0));
    assert!(!body["data"]["reasons"].as_array().unwrap().is_empty());

    let response = app.oneshot(get("/api/submissions")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let (app, _) = test_app(100).await;

    app.clone()
        .oneshot(post_json("/api/forms/contact", clean_contact_body()))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_json("/api/forms/contact", spam_contact_body()))
        .await
        .unwrap();

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], json!(2));
    assert_eq!(body["data"]["spam"], json!(1));
    assert_eq!(body["data"]["pending_review"], json!(1));
    assert_eq!(body["data"]["contact"], json!(2));
}

#[tokio::test]
async fn test_form_routes_are_rate_limited() {
    let (app, _) = test_app(2).await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/api/forms/contact", clean_contact_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(post_json("/api/forms/contact", clean_contact_body()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // Admin routes are not rate limited
    let response = app.oneshot(get("/api/submissions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
