//! Shared types for the contact intake pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::notify::NotifyResult;
use crate::store::{ContactRecord, NewContact};

/// Raw contact form submission, exactly as posted by the site.
///
/// String fields default to empty when missing so a sparse body surfaces
/// as validation errors ("required") rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl Submission {
    /// Normalize a validated submission for storage: trim everything and
    /// collapse empty optional fields to `None` so the datastore keeps
    /// "not provided" distinct from "empty".
    pub fn normalize(&self) -> NewContact {
        let opt = |s: &str| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        };
        NewContact {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: opt(&self.email),
            suburb: opt(&self.suburb),
            message: opt(&self.message),
            address: self.address.as_deref().and_then(opt),
            lat: self.lat,
            lng: self.lng,
        }
    }
}

/// Field name → human-readable error message. BTreeMap for stable ordering.
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Per-channel notification results, returned in the success body for
/// observability only.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationReport {
    pub email: NotifyResult,
    pub whatsapp: NotifyResult,
}

/// Terminal outcome of one intake pipeline run.
#[derive(Debug)]
pub enum IntakeOutcome {
    /// Validation passed and the record was persisted. Notification
    /// results ride along whether or not they succeeded.
    Created {
        record: ContactRecord,
        notifications: NotificationReport,
    },
    /// Validation failed — the full error map, no side effects occurred.
    Rejected(ValidationErrors),
    /// The datastore insert failed. Opaque to the caller by design.
    StoreFailed,
}
