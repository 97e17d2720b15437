//! POST /api/contact — the intake pipeline endpoint.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::intake::{IntakeOutcome, Submission};
use crate::routes::AppState;

/// POST /api/contact
///
/// 201 with the stored record and per-channel notification results,
/// 422 with the full field error map, 400 on a malformed body,
/// 500 when the insert fails (opaque — no storage detail leaks).
pub async fn post_contact(
    State(state): State<AppState>,
    body: Result<Json<Submission>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(submission)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Invalid request body"})),
        );
    };

    match state.pipeline.submit(submission).await {
        IntakeOutcome::Created {
            record,
            notifications,
        } => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "ok": true,
                "data": record,
                "notifications": notifications,
            })),
        ),
        IntakeOutcome::Rejected(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "message": "Validation failed",
                "errors": errors,
            })),
        ),
        IntakeOutcome::StoreFailed => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"message": "Failed to save contact"})),
        ),
    }
}
