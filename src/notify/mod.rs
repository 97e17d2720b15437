//! Best-effort notification channels for new contact submissions.
//!
//! Every channel returns a [`NotifyResult`] rather than an error: a failed
//! or unconfigured notification is diagnostic data in the response body,
//! never a reason to fail the request that produced it.

pub mod email;
pub mod whatsapp;

use async_trait::async_trait;
use serde::Serialize;

use crate::store::ContactRecord;

pub use email::EmailNotifier;
pub use whatsapp::WhatsAppNotifier;

/// Timeout for every outbound provider call. Providers get one bounded
/// attempt; there is no retry.
pub const PROVIDER_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Outcome of one notification attempt on one channel.
#[derive(Debug, Clone, Serialize)]
pub struct NotifyResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl NotifyResult {
    /// The channel has no usable credentials — soft no-op, not an error.
    pub fn not_configured(detail: &str) -> Self {
        Self {
            ok: false,
            provider: None,
            status: None,
            detail: Some(detail.to_string()),
        }
    }

    /// Provider accepted the message.
    pub fn sent(provider: &str, status: u16) -> Self {
        Self {
            ok: true,
            provider: Some(provider.to_string()),
            status: Some(status),
            detail: None,
        }
    }

    /// Provider returned a non-success HTTP status.
    pub fn rejected(provider: &str, status: u16, detail: String) -> Self {
        Self {
            ok: false,
            provider: Some(provider.to_string()),
            status: Some(status),
            detail: Some(detail),
        }
    }

    /// Transport-level failure before any HTTP status was received.
    pub fn transport_error(provider: &str, detail: String) -> Self {
        Self {
            ok: false,
            provider: Some(provider.to_string()),
            status: None,
            detail: Some(detail),
        }
    }
}

/// A best-effort notification channel for new contacts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Channel name used in logs ("email", "whatsapp").
    fn channel(&self) -> &'static str;

    /// Send a notification summarizing the record. Never errors — every
    /// failure mode is folded into the returned result.
    async fn notify(&self, record: &ContactRecord) -> NotifyResult;
}
