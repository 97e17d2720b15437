//! GET/POST /api/reviews — customer reviews.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::routes::AppState;
use crate::store::NewReview;

/// Maximum reviews returned by the listing endpoint.
const REVIEW_LIMIT: usize = 100;

/// GET /api/reviews — latest reviews, newest first.
pub async fn get_reviews(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list_reviews(REVIEW_LIMIT).await {
        Ok(reviews) => (StatusCode::OK, Json(serde_json::json!(reviews))),
        Err(e) => {
            error!(error = %e, "Failed to fetch reviews");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!([])),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    suburb: String,
}

/// POST /api/reviews — create a review. Name and a numeric rating are
/// required; text and suburb are optional.
pub async fn post_review(
    State(state): State<AppState>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Invalid request body"})),
        );
    };

    let name = request.name.trim().to_string();
    // A zero rating is treated as missing, as the site form never emits one.
    let rating = request.rating.filter(|r| r.is_finite() && *r != 0.0);
    let Some(rating) = rating else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Missing or invalid fields"})),
        );
    };
    if name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"message": "Missing or invalid fields"})),
        );
    }

    let opt = |s: &str| {
        let t = s.trim();
        (!t.is_empty()).then(|| t.to_string())
    };

    let new_review = NewReview {
        name,
        rating,
        text: opt(&request.text),
        suburb: opt(&request.suburb),
    };

    match state.store.insert_review(&new_review).await {
        Ok(review) => (StatusCode::OK, Json(serde_json::json!(review))),
        Err(e) => {
            error!(error = %e, "Failed to insert review");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"message": "Database error"})),
            )
        }
    }
}
