//! HTTP API — axum router and handlers.

mod chat;
mod contact;
mod newsletter;
mod reviews;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::chat::ChatClient;
use crate::intake::ContactPipeline;
use crate::notify::EmailNotifier;
use crate::store::Store;

/// Shared state for all API handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ContactPipeline>,
    pub store: Arc<dyn Store>,
    /// Used directly by the newsletter confirmation mail.
    pub email: Arc<EmailNotifier>,
    /// `None` when the chat proxy is unconfigured.
    pub chat: Option<Arc<ChatClient>>,
}

/// Build the API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/contact", post(contact::post_contact))
        .route("/api/newsletter", post(newsletter::post_newsletter))
        .route(
            "/api/reviews",
            get(reviews::get_reviews).post(reviews::post_review),
        )
        .route("/api/chat", post(chat::post_chat))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
