//! Chat proxy — forwards site-widget conversations to an OpenAI-compatible
//! chat-completions API.

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::ChatConfig;
use crate::error::ChatError;

/// Timeout for one completion request. Longer than notification calls —
/// model inference is slow, but the request must still be bounded.
const CHAT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60);

/// Sampling temperature — kept low for a support widget.
const CHAT_TEMPERATURE: f32 = 0.2;

/// One turn in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Thin client over a hosted chat-completions endpoint.
pub struct ChatClient {
    config: ChatConfig,
    client: reqwest::Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::builder()
                .timeout(CHAT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Send a conversation and return the first choice's reply text.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: Option<u32>,
    ) -> Result<String, ChatError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let payload = json!({
            "model": self.config.model,
            "messages": messages,
            "max_tokens": max_tokens.unwrap_or(self.config.max_tokens),
            "temperature": CHAT_TEMPERATURE,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChatError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::RequestFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ChatError::InvalidResponse(e.to_string()))?;

        let reply = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                ChatError::InvalidResponse("no message content in first choice".to_string())
            })?
            .to_string();

        debug!(model = %self.config.model, reply_chars = reply.len(), "Chat completion received");
        Ok(reply)
    }
}
