//! POST /api/chat — proxy to the hosted language-model API.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::chat::ChatMessage;
use crate::routes::AppState;

/// Accepts either a bare `prompt` or a full `messages` history.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    prompt: Option<String>,
    #[serde(default)]
    messages: Option<Vec<ChatMessage>>,
    #[serde(default)]
    max_tokens: Option<u32>,
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Some(chat) = state.chat.clone() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({"error": "Chat is not configured"})),
        );
    };

    let Ok(Json(request)) = body else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Invalid request body"})),
        );
    };

    let messages = match (request.messages, request.prompt) {
        (Some(messages), _) if !messages.is_empty() => messages,
        (_, Some(prompt)) if !prompt.trim().is_empty() => vec![ChatMessage {
            role: "user".to_string(),
            content: prompt,
        }],
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": "No prompt or messages provided"})),
            );
        }
    };

    match chat.complete(&messages, request.max_tokens).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(serde_json::json!({"ok": true, "reply": reply})),
        ),
        Err(e) => {
            error!(error = %e, "Chat completion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": e.to_string()})),
            )
        }
    }
}
