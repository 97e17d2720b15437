//! POST /api/newsletter — newsletter signup.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::{error, warn};

use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    email: String,
}

/// POST /api/newsletter
///
/// Duplicate signups are idempotent: a unique-constraint hit returns the
/// existing row with `existing: true` instead of an error. A confirmation
/// email is sent best-effort when the mail channel is configured.
pub async fn post_newsletter(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Invalid request body"})),
        );
    };

    let email = request.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Invalid email"})),
        );
    }

    match state.store.insert_subscriber(&email).await {
        Ok(subscriber) => {
            // Best-effort confirmation; a failure is logged and dropped.
            let result = state
                .email
                .send(
                    &email,
                    "Thanks for subscribing",
                    "<p>Thanks for subscribing to GoodGeeks updates.</p>",
                )
                .await;
            if !result.ok {
                warn!(%email, detail = ?result.detail, "Newsletter confirmation not sent");
            }

            (
                StatusCode::OK,
                Json(serde_json::json!({"ok": true, "data": subscriber})),
            )
        }
        Err(e) if e.is_constraint() => match state.store.get_subscriber(&email).await {
            Ok(Some(existing)) => (
                StatusCode::OK,
                Json(serde_json::json!({"ok": true, "existing": true, "data": existing})),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "DB error"})),
            ),
        },
        Err(e) => {
            error!(error = %e, "Newsletter insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "DB error"})),
            )
        }
    }
}
