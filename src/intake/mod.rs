//! Contact intake — the validate → persist → notify pipeline.

pub mod pipeline;
pub mod types;
pub mod validate;

pub use pipeline::ContactPipeline;
pub use types::{IntakeOutcome, NotificationReport, Submission, ValidationErrors};
