//! `Store` trait — single async interface for all persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::DatabaseError;

/// A validated contact submission, ready to persist.
///
/// Optional fields are `None` when the visitor left them blank — empty
/// strings are normalized away before this struct is built, so storage
/// can tell "not provided" from "empty".
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub suburb: Option<String>,
    pub message: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// A persisted contact record. Written once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ContactRecord {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub suburb: Option<String>,
    pub message: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A newsletter subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A new customer review, pre-persistence.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub name: String,
    /// Ratings come straight from the widget and may be fractional (4.5).
    pub rating: f64,
    pub text: Option<String>,
    pub suburb: Option<String>,
}

/// A persisted customer review.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub name: String,
    pub rating: f64,
    pub text: Option<String>,
    pub suburb: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Backend-agnostic persistence trait covering contacts, subscribers
/// and reviews.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a contact record, returning the stored row with its
    /// generated id and timestamp.
    async fn insert_contact(&self, new: &NewContact) -> Result<ContactRecord, DatabaseError>;

    /// Insert a newsletter subscriber. A duplicate email surfaces as
    /// `DatabaseError::Constraint`.
    async fn insert_subscriber(&self, email: &str) -> Result<Subscriber, DatabaseError>;

    /// Look up a subscriber by email.
    async fn get_subscriber(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError>;

    /// Insert a customer review, returning the stored row.
    async fn insert_review(&self, new: &NewReview) -> Result<Review, DatabaseError>;

    /// Latest reviews, newest first, up to `limit`.
    async fn list_reviews(&self, limit: usize) -> Result<Vec<Review>, DatabaseError>;
}
