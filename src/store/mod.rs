//! Persistence layer — libSQL-backed storage for contacts, subscribers
//! and reviews.

pub mod libsql_backend;
pub mod traits;

pub use libsql_backend::LibSqlBackend;
pub use traits::{ContactRecord, NewContact, NewReview, Review, Store, Subscriber};
