//! Email notifier — internal notification mail via the SendGrid HTTP API.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::json;
use tracing::{info, warn};

use crate::config::EmailConfig;
use crate::notify::{NotifyResult, Notifier, PROVIDER_TIMEOUT};
use crate::store::ContactRecord;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Sends HTML mail through SendGrid. Unconfigured when built with `None`,
/// in which case every send reports "not configured".
pub struct EmailNotifier {
    config: Option<EmailConfig>,
    client: reqwest::Client,
}

impl EmailNotifier {
    pub fn new(config: Option<EmailConfig>) -> Self {
        Self {
            config,
            client: reqwest::Client::builder()
                .timeout(PROVIDER_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Send one HTML email. Best-effort: configuration gaps, transport
    /// errors and non-success statuses all come back as a `NotifyResult`.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> NotifyResult {
        let Some(config) = &self.config else {
            return NotifyResult::not_configured("sendgrid not configured");
        };

        let payload = json!({
            "personalizations": [{ "to": [{ "email": to }] }],
            "from": { "email": config.from_address },
            "subject": subject,
            "content": [{ "type": "text/html", "value": html }],
        });

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(res) => {
                let status = res.status().as_u16();
                if res.status().is_success() {
                    info!(%to, status, "Notification email sent");
                    NotifyResult::sent("sendgrid", status)
                } else {
                    let body = res.text().await.unwrap_or_default();
                    warn!(%to, status, "SendGrid rejected notification email");
                    NotifyResult::rejected("sendgrid", status, body)
                }
            }
            Err(e) => {
                warn!(%to, error = %e, "SendGrid request failed");
                NotifyResult::transport_error("sendgrid", e.to_string())
            }
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn channel(&self) -> &'static str {
        "email"
    }

    async fn notify(&self, record: &ContactRecord) -> NotifyResult {
        let Some(config) = &self.config else {
            return NotifyResult::not_configured("sendgrid not configured");
        };

        let subject = format!("New contact from {} — Good Geeks", record.name);
        let html = contact_email_body(record);
        let receiver = config.receiver.clone();
        self.send(&receiver, &subject, &html).await
    }
}

/// Render the internal notification body. Every user-supplied field is
/// HTML-escaped before interpolation.
fn contact_email_body(record: &ContactRecord) -> String {
    let field = |v: &Option<String>| escape_html(v.as_deref().unwrap_or("-"));
    format!(
        "<h3>New Contact Submission</h3>\
         <p><strong>Name:</strong> {}</p>\
         <p><strong>Phone:</strong> {}</p>\
         <p><strong>Email:</strong> {}</p>\
         <p><strong>Suburb:</strong> {}</p>\
         <p><strong>Address:</strong> {}</p>\
         <p><strong>Message:</strong><br/>{}</p>\
         <p style=\"font-size:0.85rem;color:#666\">Submitted: {}</p>",
        escape_html(&record.name),
        escape_html(&record.phone),
        field(&record.email),
        field(&record.suburb),
        field(&record.address),
        field(&record.message),
        record.created_at.to_rfc3339(),
    )
}

/// Escape `&`, `<`, `>`, `"` and `'` for safe HTML interpolation.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record_with_name(name: &str) -> ContactRecord {
        ContactRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: "0412345678".to_string(),
            email: None,
            suburb: Some("Marrickville".to_string()),
            message: Some("PC fan is <loud> & rattling".to_string()),
            address: None,
            lat: None,
            lng: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escape_html_covers_all_special_chars() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#039;&lt;/a&gt;"
        );
    }

    #[test]
    fn script_tag_in_name_is_escaped_in_body() {
        let record = record_with_name("<script>alert(1)</script>");
        let body = contact_email_body(&record);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn absent_fields_render_as_dash() {
        let record = record_with_name("Alice");
        let body = contact_email_body(&record);
        assert!(body.contains("<strong>Email:</strong> -"));
        assert!(body.contains("<strong>Address:</strong> -"));
    }

    #[test]
    fn message_special_chars_escaped() {
        let record = record_with_name("Alice");
        let body = contact_email_body(&record);
        assert!(body.contains("PC fan is &lt;loud&gt; &amp; rattling"));
    }

    #[tokio::test]
    async fn unconfigured_send_is_soft_noop() {
        let notifier = EmailNotifier::new(None);
        let result = notifier.send("ops@example.com", "subject", "<p>hi</p>").await;
        assert!(!result.ok);
        assert!(result.provider.is_none());
        assert_eq!(result.detail.as_deref(), Some("sendgrid not configured"));
    }

    #[tokio::test]
    async fn unconfigured_notify_is_soft_noop() {
        let notifier = EmailNotifier::new(None);
        let result = notifier.notify(&record_with_name("Alice")).await;
        assert!(!result.ok);
        assert_eq!(result.detail.as_deref(), Some("sendgrid not configured"));
    }
}
