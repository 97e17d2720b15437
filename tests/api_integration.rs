//! Integration tests for the HTTP API.
//!
//! Each test spins up the real Axum router on a random port with an
//! in-memory database and unconfigured notifiers, then drives it over
//! HTTP with reqwest.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;

use goodgeeks_api::intake::ContactPipeline;
use goodgeeks_api::notify::{EmailNotifier, Notifier, WhatsAppNotifier};
use goodgeeks_api::routes::{AppState, api_routes};
use goodgeeks_api::store::{LibSqlBackend, Store};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server on a random port and return its base URL.
async fn start_server() -> String {
    let store: Arc<dyn Store> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
    let email = Arc::new(EmailNotifier::new(None));
    let whatsapp: Arc<dyn Notifier> = Arc::new(WhatsAppNotifier::new(None, None));
    let email_notifier: Arc<dyn Notifier> = email.clone();

    let pipeline = Arc::new(ContactPipeline::new(
        Arc::clone(&store),
        email_notifier,
        whatsapp,
    ));

    let app = api_routes(AppState {
        pipeline,
        store,
        email,
        chat: None,
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn valid_contact_is_created_with_notification_results() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/contact"))
            .json(&json!({
                "name": "Jo",
                "phone": "0412345678",
                "message": "Fridge won't turn on"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 201);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["ok"], json!(true));
        assert!(body["data"]["id"].is_string());
        assert_eq!(body["data"]["name"], json!("Jo"));
        // Optional fields omitted by the client come back as explicit nulls.
        assert!(body["data"]["email"].is_null());
        assert!(body["data"]["suburb"].is_null());
        // Both channels unconfigured — still a success, soft results attached.
        assert_eq!(body["notifications"]["email"]["ok"], json!(false));
        assert_eq!(
            body["notifications"]["email"]["detail"],
            json!("sendgrid not configured")
        );
        assert_eq!(body["notifications"]["whatsapp"]["ok"], json!(false));
        assert_eq!(
            body["notifications"]["whatsapp"]["detail"],
            json!("no whatsapp provider configured")
        );
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn invalid_submission_returns_full_error_map() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/contact"))
            .json(&json!({
                "name": "J",
                "phone": "123",
                "email": "nope"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 422);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], json!("Validation failed"));
        assert!(body["errors"]["name"].is_string());
        assert!(body["errors"]["phone"].is_string());
        assert!(body["errors"]["email"].is_string());
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/contact"))
            .header("content-type", "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], json!("Invalid request body"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn newsletter_signup_is_idempotent() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/newsletter"))
            .json(&json!({"email": "Jo@Example.COM"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["ok"], json!(true));
        // Email is normalized to lowercase.
        assert_eq!(body["data"]["email"], json!("jo@example.com"));

        // Same address again: same row back, flagged as existing.
        let res = client
            .post(format!("{base}/api/newsletter"))
            .json(&json!({"email": "jo@example.com"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["existing"], json!(true));
        assert_eq!(body["data"]["email"], json!("jo@example.com"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn newsletter_rejects_junk_email() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/newsletter"))
            .json(&json!({"email": "not-an-email"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], json!("Invalid email"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn reviews_round_trip() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/reviews"))
            .json(&json!({"name": "Sam", "rating": 5, "text": "Fixed my NAS same day"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let created: Value = res.json().await.unwrap();
        assert_eq!(created["rating"].as_f64(), Some(5.0));

        let res = client
            .get(format!("{base}/api/reviews"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let reviews: Value = res.json().await.unwrap();
        let list = reviews.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["name"], json!("Sam"));
        assert_eq!(list[0]["text"], json!("Fixed my NAS same day"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn fractional_review_rating_is_preserved() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/reviews"))
            .json(&json!({"name": "Sam", "rating": 4.5}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let created: Value = res.json().await.unwrap();
        assert_eq!(created["rating"].as_f64(), Some(4.5));

        let res = client
            .get(format!("{base}/api/reviews"))
            .send()
            .await
            .unwrap();
        let reviews: Value = res.json().await.unwrap();
        assert_eq!(reviews[0]["rating"].as_f64(), Some(4.5));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn zero_review_rating_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/reviews"))
            .json(&json!({"name": "Sam", "rating": 0}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn review_without_rating_is_rejected() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/reviews"))
            .json(&json!({"name": "Sam"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 400);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], json!("Missing or invalid fields"));
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn chat_unconfigured_is_unavailable() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client
            .post(format!("{base}/api/chat"))
            .json(&json!({"prompt": "My wifi drops every evening"}))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 503);
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn health_endpoint_responds() {
    timeout(TEST_TIMEOUT, async {
        let base = start_server().await;
        let client = reqwest::Client::new();

        let res = client.get(format!("{base}/health")).send().await.unwrap();
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], json!("ok"));
    })
    .await
    .unwrap();
}
