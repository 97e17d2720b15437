//! Contact intake pipeline — validate, persist, notify.
//!
//! Three phases with one point of no return:
//! 1. Validation fails fast with the full error map, before any side effect.
//! 2. Persistence is the durability boundary: once the insert succeeds the
//!    request cannot be rejected.
//! 3. Notification is best-effort. Both channels run after persistence,
//!    independently; their results are captured, never propagated.

use std::sync::Arc;

use tracing::{error, info};

use crate::intake::types::{IntakeOutcome, NotificationReport, Submission};
use crate::intake::validate::validate_submission;
use crate::notify::Notifier;
use crate::store::Store;

/// The intake pipeline. Holds its collaborators explicitly — no implicit
/// environment lookup below this point.
pub struct ContactPipeline {
    store: Arc<dyn Store>,
    email: Arc<dyn Notifier>,
    whatsapp: Arc<dyn Notifier>,
}

impl ContactPipeline {
    pub fn new(store: Arc<dyn Store>, email: Arc<dyn Notifier>, whatsapp: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            email,
            whatsapp,
        }
    }

    /// Run one submission through the full pipeline.
    pub async fn submit(&self, submission: Submission) -> IntakeOutcome {
        let errors = validate_submission(&submission);
        if !errors.is_empty() {
            info!(error_count = errors.len(), "Contact submission rejected");
            return IntakeOutcome::Rejected(errors);
        }

        let new_contact = submission.normalize();
        let record = match self.store.insert_contact(&new_contact).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Failed to save contact");
                return IntakeOutcome::StoreFailed;
            }
        };

        info!(contact_id = %record.id, "Contact saved");

        // Both channels fire after the durability boundary, independently.
        // Neither can fail the request or block the other.
        let (email, whatsapp) =
            tokio::join!(self.email.notify(&record), self.whatsapp.notify(&record));

        info!(
            email_ok = email.ok,
            whatsapp_ok = whatsapp.ok,
            contact_id = %record.id,
            "Notification fan-out complete"
        );

        IntakeOutcome::Created {
            record,
            notifications: NotificationReport { email, whatsapp },
        }
    }
}
