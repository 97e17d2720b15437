//! libSQL backend — async `Store` trait implementation.
//!
//! Supports local file and in-memory databases. A single connection is
//! reused for all operations; `libsql::Connection` is `Send + Sync` and
//! safe for concurrent async use.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::traits::{ContactRecord, NewContact, NewReview, Review, Store, Subscriber};

/// libSQL database backend.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and initialize the schema.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.init_schema().await?;
        Ok(backend)
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Create tables and indexes if they don't exist. Idempotent.
    async fn init_schema(&self) -> Result<(), DatabaseError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS contacts (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    phone TEXT NOT NULL,
                    email TEXT,
                    suburb TEXT,
                    message TEXT,
                    address TEXT,
                    lat REAL,
                    lng REAL,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_contacts_created_at ON contacts(created_at);

                CREATE TABLE IF NOT EXISTS newsletter (
                    id TEXT PRIMARY KEY,
                    email TEXT NOT NULL UNIQUE,
                    created_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS reviews (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    rating REAL NOT NULL,
                    text TEXT,
                    suburb TEXT,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_reviews_created_at ON reviews(created_at);",
            )
            .await
            .map_err(|e| DatabaseError::Migration(format!("init_schema: {e}")))?;

        debug!("Database schema initialized");
        Ok(())
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string (our canonical write format).
fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Convert `Option<&str>` to a libsql Value (NULL when absent).
fn opt_text(s: Option<&str>) -> libsql::Value {
    match s {
        Some(s) => libsql::Value::Text(s.to_string()),
        None => libsql::Value::Null,
    }
}

/// Convert `Option<f64>` to a libsql Value (NULL when absent).
fn opt_real(v: Option<f64>) -> libsql::Value {
    match v {
        Some(v) => libsql::Value::Real(v),
        None => libsql::Value::Null,
    }
}

/// Map a libsql error, marking unique-constraint violations so callers
/// can branch on duplicates.
fn map_query_err(op: &str, e: libsql::Error) -> DatabaseError {
    let msg = e.to_string();
    if msg.contains("UNIQUE constraint failed") {
        DatabaseError::Constraint(format!("{op}: {msg}"))
    } else {
        DatabaseError::Query(format!("{op}: {msg}"))
    }
}

fn row_to_review(row: &libsql::Row) -> Result<Review, libsql::Error> {
    let id_str: String = row.get(0)?;
    let created_str: String = row.get(5)?;
    Ok(Review {
        id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
        name: row.get(1)?,
        rating: row.get(2)?,
        text: row.get(3).ok(),
        suburb: row.get(4).ok(),
        created_at: parse_datetime(&created_str),
    })
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl Store for LibSqlBackend {
    async fn insert_contact(&self, new: &NewContact) -> Result<ContactRecord, DatabaseError> {
        let conn = self.conn();
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO contacts (id, name, phone, email, suburb, message, address, lat, lng, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                id.to_string(),
                new.name.as_str(),
                new.phone.as_str(),
                opt_text(new.email.as_deref()),
                opt_text(new.suburb.as_deref()),
                opt_text(new.message.as_deref()),
                opt_text(new.address.as_deref()),
                opt_real(new.lat),
                opt_real(new.lng),
                created_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| map_query_err("insert_contact", e))?;

        debug!(contact_id = %id, "Contact inserted");

        Ok(ContactRecord {
            id,
            name: new.name.clone(),
            phone: new.phone.clone(),
            email: new.email.clone(),
            suburb: new.suburb.clone(),
            message: new.message.clone(),
            address: new.address.clone(),
            lat: new.lat,
            lng: new.lng,
            created_at,
        })
    }

    async fn insert_subscriber(&self, email: &str) -> Result<Subscriber, DatabaseError> {
        let conn = self.conn();
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO newsletter (id, email, created_at) VALUES (?1, ?2, ?3)",
            params![id.to_string(), email, created_at.to_rfc3339()],
        )
        .await
        .map_err(|e| map_query_err("insert_subscriber", e))?;

        debug!(%email, "Subscriber inserted");

        Ok(Subscriber {
            id,
            email: email.to_string(),
            created_at,
        })
    }

    async fn get_subscriber(&self, email: &str) -> Result<Option<Subscriber>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT id, email, created_at FROM newsletter WHERE email = ?1",
                params![email],
            )
            .await
            .map_err(|e| map_query_err("get_subscriber", e))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let id_str: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_subscriber row: {e}")))?;
                let email: String = row
                    .get(1)
                    .map_err(|e| DatabaseError::Query(format!("get_subscriber row: {e}")))?;
                let created_str: String = row
                    .get(2)
                    .map_err(|e| DatabaseError::Query(format!("get_subscriber row: {e}")))?;
                Ok(Some(Subscriber {
                    id: Uuid::parse_str(&id_str).unwrap_or_else(|_| Uuid::nil()),
                    email,
                    created_at: parse_datetime(&created_str),
                }))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_subscriber: {e}"))),
        }
    }

    async fn insert_review(&self, new: &NewReview) -> Result<Review, DatabaseError> {
        let conn = self.conn();
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO reviews (id, name, rating, text, suburb, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                id.to_string(),
                new.name.as_str(),
                new.rating,
                opt_text(new.text.as_deref()),
                opt_text(new.suburb.as_deref()),
                created_at.to_rfc3339(),
            ],
        )
        .await
        .map_err(|e| map_query_err("insert_review", e))?;

        debug!(review_id = %id, "Review inserted");

        Ok(Review {
            id,
            name: new.name.clone(),
            rating: new.rating,
            text: new.text.clone(),
            suburb: new.suburb.clone(),
            created_at,
        })
    }

    async fn list_reviews(&self, limit: usize) -> Result<Vec<Review>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                "SELECT id, name, rating, text, suburb, created_at FROM reviews \
                 ORDER BY created_at DESC LIMIT ?1",
                params![limit as i64],
            )
            .await
            .map_err(|e| map_query_err("list_reviews", e))?;

        let mut reviews = Vec::new();
        while let Ok(Some(row)) = rows.next().await {
            let review = row_to_review(&row)
                .map_err(|e| DatabaseError::Query(format!("list_reviews row parse: {e}")))?;
            reviews.push(review);
        }
        Ok(reviews)
    }
}

// ── Tests ───────────────────────────────────────────────────────────
