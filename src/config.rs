//! Configuration types.
//!
//! All credentials come in through explicit structs built once at startup —
//! nothing below the composition root reads the process environment. A
//! feature whose credential set is incomplete is disabled (its config
//! section is `None`), never an error.

use std::str::FromStr;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Parse an optional environment variable. Absent is `Ok(None)`; present
/// but unparsable is an error rather than a silent default.
fn env_parse<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port for the HTTP server.
    pub port: u16,
    /// Path to the local database file.
    pub db_path: String,
    /// SendGrid email notifications (None = disabled).
    pub email: Option<EmailConfig>,
    /// Twilio WhatsApp provider (None = disabled).
    pub twilio: Option<TwilioConfig>,
    /// WhatsApp Cloud API provider (None = disabled).
    pub whatsapp_cloud: Option<WhatsAppCloudConfig>,
    /// Chat proxy backend (None = disabled).
    pub chat: Option<ChatConfig>,
}

impl AppConfig {
    /// Build the full configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse::<u16>("PORT")?.unwrap_or(8080);

        let db_path = std::env::var("GOODGEEKS_DB_PATH")
            .unwrap_or_else(|_| "./data/goodgeeks.db".to_string());

        Ok(Self {
            port,
            db_path,
            email: EmailConfig::from_env(),
            twilio: TwilioConfig::from_env(),
            whatsapp_cloud: WhatsAppCloudConfig::from_env(),
            chat: ChatConfig::from_env()?,
        })
    }
}

/// SendGrid configuration for outbound notification email.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: SecretString,
    pub from_address: String,
    /// Internal address that receives contact notifications.
    pub receiver: String,
}

impl EmailConfig {
    /// Build config from environment variables.
    /// Returns `None` unless key, sender and receiver are all set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("SENDGRID_API_KEY").ok()?;
        let from_address = std::env::var("SENDGRID_FROM_EMAIL").ok()?;
        let receiver = std::env::var("CONTACT_RECEIVER_EMAIL").ok()?;
        Some(Self {
            api_key: SecretString::from(api_key),
            from_address,
            receiver,
        })
    }
}

/// Twilio WhatsApp provider configuration.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: SecretString,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_address: String,
    /// Operator destination, e.g. `whatsapp:+614XXXXXXXX`.
    pub to_address: String,
}

impl TwilioConfig {
    /// Returns `None` unless all four values are set.
    pub fn from_env() -> Option<Self> {
        let account_sid = std::env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = std::env::var("TWILIO_AUTH_TOKEN").ok()?;
        let from_address = std::env::var("TWILIO_WHATSAPP_FROM").ok()?;
        let to_address = std::env::var("ADMIN_WHATSAPP_TO").ok()?;
        Some(Self {
            account_sid,
            auth_token: SecretString::from(auth_token),
            from_address,
            to_address,
        })
    }
}

/// WhatsApp Cloud API (graph) provider configuration.
#[derive(Debug, Clone)]
pub struct WhatsAppCloudConfig {
    pub access_token: SecretString,
    /// Business phone-number id used in the endpoint path.
    pub phone_id: String,
    /// Operator destination number, digits only.
    pub to_number: String,
}

impl WhatsAppCloudConfig {
    /// Returns `None` unless token, phone id and destination are all set.
    pub fn from_env() -> Option<Self> {
        let access_token = std::env::var("WA_ACCESS_TOKEN").ok()?;
        let phone_id = std::env::var("WA_PHONE_ID").ok()?;
        let to_number = std::env::var("ADMIN_WHATSAPP_TO_NUMBER").ok()?;
        Some(Self {
            access_token: SecretString::from(access_token),
            phone_id,
            to_number,
        })
    }
}

/// Chat proxy configuration (OpenAI-compatible completions API).
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
}

impl ChatConfig {
    /// Returns `Ok(None)` if `OPENAI_API_KEY` is not set (chat disabled).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
            return Ok(None);
        };

        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env_parse::<u32>("OPENAI_MAX_TOKENS")?.unwrap_or(500);

        Ok(Some(Self {
            api_key: SecretString::from(api_key),
            base_url,
            model,
            max_tokens,
        }))
    }
}
