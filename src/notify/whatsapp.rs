//! WhatsApp notifier — ordered provider chain.
//!
//! Providers are tried in a fixed priority order (Twilio, then the
//! WhatsApp Cloud API). The first provider with a complete credential set
//! handles the message and its outcome is final: a transport error or a
//! non-success HTTP status from a configured provider does NOT fall
//! through to the next one. Selection is on configuration only.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{info, warn};

use crate::config::{TwilioConfig, WhatsAppCloudConfig};
use crate::notify::{NotifyResult, Notifier, PROVIDER_TIMEOUT};
use crate::store::ContactRecord;

/// Characters of the message field included in the summary text.
const MESSAGE_PREVIEW_CHARS: usize = 200;

/// One WhatsApp-capable delivery path.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Provider name used in results and logs.
    fn name(&self) -> &'static str;

    /// Whether this provider has a complete credential set.
    fn configured(&self) -> bool;

    /// One bounded send attempt. No retry.
    async fn attempt(&self, text: &str) -> NotifyResult;
}

// ── Twilio ──────────────────────────────────────────────────────────

/// Twilio WhatsApp — form-encoded POST with basic auth.
pub struct TwilioProvider {
    config: Option<TwilioConfig>,
    client: reqwest::Client,
}

impl TwilioProvider {
    pub fn new(config: Option<TwilioConfig>) -> Self {
        Self {
            config,
            client: reqwest::Client::builder()
                .timeout(PROVIDER_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MessagingProvider for TwilioProvider {
    fn name(&self) -> &'static str {
        "twilio"
    }

    fn configured(&self) -> bool {
        self.config.is_some()
    }

    async fn attempt(&self, text: &str) -> NotifyResult {
        let Some(config) = &self.config else {
            return NotifyResult::not_configured("twilio not configured");
        };

        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            config.account_sid
        );
        let form = [
            ("From", config.from_address.as_str()),
            ("To", config.to_address.as_str()),
            ("Body", text),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&config.account_sid, Some(config.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await;

        match response {
            Ok(res) => {
                let status = res.status().as_u16();
                if res.status().is_success() {
                    info!(status, "WhatsApp message sent via Twilio");
                    NotifyResult::sent("twilio", status)
                } else {
                    let body = res.text().await.unwrap_or_default();
                    warn!(status, "Twilio rejected WhatsApp message");
                    NotifyResult::rejected("twilio", status, body)
                }
            }
            Err(e) => {
                warn!(error = %e, "Twilio request failed");
                NotifyResult::transport_error("twilio", e.to_string())
            }
        }
    }
}

// ── WhatsApp Cloud API ──────────────────────────────────────────────

/// WhatsApp Cloud API — JSON POST with a bearer token against the
/// messaging graph endpoint.
pub struct CloudApiProvider {
    config: Option<WhatsAppCloudConfig>,
    client: reqwest::Client,
}

impl CloudApiProvider {
    pub fn new(config: Option<WhatsAppCloudConfig>) -> Self {
        Self {
            config,
            client: reqwest::Client::builder()
                .timeout(PROVIDER_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl MessagingProvider for CloudApiProvider {
    fn name(&self) -> &'static str {
        "whatsapp_cloud"
    }

    fn configured(&self) -> bool {
        self.config.is_some()
    }

    async fn attempt(&self, text: &str) -> NotifyResult {
        let Some(config) = &self.config else {
            return NotifyResult::not_configured("whatsapp cloud not configured");
        };

        let url = format!(
            "https://graph.facebook.com/v17.0/{}/messages",
            config.phone_id
        );
        let payload = json!({
            "messaging_product": "whatsapp",
            "to": config.to_number,
            "type": "text",
            "text": { "body": text },
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(config.access_token.expose_secret())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) => {
                let status = res.status().as_u16();
                if res.status().is_success() {
                    info!(status, "WhatsApp message sent via Cloud API");
                    NotifyResult::sent("whatsapp_cloud", status)
                } else {
                    let body = res.text().await.unwrap_or_default();
                    warn!(status, "Cloud API rejected WhatsApp message");
                    NotifyResult::rejected("whatsapp_cloud", status, body)
                }
            }
            Err(e) => {
                warn!(error = %e, "Cloud API request failed");
                NotifyResult::transport_error("whatsapp_cloud", e.to_string())
            }
        }
    }
}

// ── Notifier ────────────────────────────────────────────────────────

/// WhatsApp notifier over an ordered list of provider strategies.
pub struct WhatsAppNotifier {
    providers: Vec<Box<dyn MessagingProvider>>,
}

impl WhatsAppNotifier {
    /// Build the default chain: Twilio first, Cloud API as fallback.
    pub fn new(twilio: Option<TwilioConfig>, cloud: Option<WhatsAppCloudConfig>) -> Self {
        Self {
            providers: vec![
                Box::new(TwilioProvider::new(twilio)),
                Box::new(CloudApiProvider::new(cloud)),
            ],
        }
    }

    /// Build a chain from explicit providers (tests).
    pub fn with_providers(providers: Vec<Box<dyn MessagingProvider>>) -> Self {
        Self { providers }
    }

    /// Send a plain-text message through the first configured provider.
    pub async fn send_text(&self, text: &str) -> NotifyResult {
        for provider in &self.providers {
            if provider.configured() {
                return provider.attempt(text).await;
            }
        }
        NotifyResult::not_configured("no whatsapp provider configured")
    }
}

#[async_trait]
impl Notifier for WhatsAppNotifier {
    fn channel(&self) -> &'static str {
        "whatsapp"
    }

    async fn notify(&self, record: &ContactRecord) -> NotifyResult {
        self.send_text(&contact_summary_text(record)).await
    }
}

/// Plain-text operator summary of a new contact.
fn contact_summary_text(record: &ContactRecord) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let message = record
        .message
        .as_deref()
        .map(|m| m.chars().take(MESSAGE_PREVIEW_CHARS).collect::<String>())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "New Contact\nName: {}\nPhone: {}\nEmail: {}\nSuburb: {}\nMessage: {}",
        record.name,
        record.phone,
        field(&record.email),
        field(&record.suburb),
        message,
    )
}
