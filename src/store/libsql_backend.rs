//! libSQL backend — async `TicketStore` implementation.
//!
//! Supports local file and in-memory databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use libsql::{Connection, Database as LibSqlDatabase, params};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::analyzer::AnalysisResult;
use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{TicketRecord, TicketStore};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        backend.run_migrations().await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

/// Fixed-width RFC 3339 so that `ORDER BY created_at` sorts chronologically.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("bad created_at {s:?}: {e}"))
}

/// Map a libsql Row to a TicketRecord.
///
/// Column order matches TICKET_COLUMNS:
/// 0:id, 1:message, 2:category, 3:priority, 4:urgency, 5:keywords, 6:confidence, 7:created_at
fn row_to_ticket(row: &libsql::Row) -> Result<TicketRecord, String> {
    let id_str: String = row.get(0).map_err(|e| e.to_string())?;
    let message: String = row.get(1).map_err(|e| e.to_string())?;
    let category_str: String = row.get(2).map_err(|e| e.to_string())?;
    let priority_str: String = row.get(3).map_err(|e| e.to_string())?;
    let urgency: i64 = row.get(4).map_err(|e| e.to_string())?;
    let keywords_str: String = row.get(5).map_err(|e| e.to_string())?;
    let confidence: f64 = row.get(6).map_err(|e| e.to_string())?;
    let created_str: String = row.get(7).map_err(|e| e.to_string())?;

    Ok(TicketRecord {
        id: Uuid::parse_str(&id_str).map_err(|e| format!("bad id {id_str:?}: {e}"))?,
        message,
        category: category_str.parse()?,
        priority: priority_str.parse()?,
        urgency: urgency != 0,
        keywords: serde_json::from_str(&keywords_str)
            .map_err(|e| format!("bad keywords {keywords_str:?}: {e}"))?,
        confidence,
        created_at: parse_datetime(&created_str)?,
    })
}

// ── Trait implementation ────────────────────────────────────────────

const TICKET_COLUMNS: &str =
    "id, message, category, priority, urgency, keywords, confidence, created_at";

#[async_trait]
impl TicketStore for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn insert_ticket(&self, result: &AnalysisResult) -> Result<TicketRecord, DatabaseError> {
        let record = TicketRecord::from_analysis(result);
        let keywords = serde_json::to_string(&record.keywords)
            .map_err(|e| DatabaseError::Serialization(format!("keywords: {e}")))?;

        let conn = self.conn();
        conn.execute(
            &format!("INSERT INTO tickets ({TICKET_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"),
            params![
                record.id.to_string(),
                record.message.clone(),
                record.category.as_str(),
                record.priority.as_str(),
                i64::from(record.urgency),
                keywords,
                record.confidence,
                format_datetime(&record.created_at),
            ],
        )
        .await
        .map_err(|e| DatabaseError::Query(format!("insert_ticket: {e}")))?;

        debug!(
            id = %record.id,
            category = %record.category,
            priority = %record.priority,
            "Ticket inserted into DB"
        );
        Ok(record)
    }

    async fn get_ticket(&self, id: Uuid) -> Result<Option<TicketRecord>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ?1"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_ticket: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let ticket = row_to_ticket(&row)
                    .map_err(|e| DatabaseError::Serialization(format!("get_ticket row parse: {e}")))?;
                Ok(Some(ticket))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_ticket: {e}"))),
        }
    }

    async fn list_tickets(&self) -> Result<Vec<TicketRecord>, DatabaseError> {
        let conn = self.conn();
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {TICKET_COLUMNS} FROM tickets ORDER BY created_at DESC, rowid DESC"
                ),
                (),
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("list_tickets: {e}")))?;

        let mut tickets = Vec::new();
        loop {
            match rows.next().await {
                Ok(Some(row)) => match row_to_ticket(&row) {
                    Ok(ticket) => tickets.push(ticket),
                    Err(e) => warn!("Skipping ticket row: {e}"),
                },
                Ok(None) => break,
                Err(e) => return Err(DatabaseError::Query(format!("list_tickets: {e}"))),
            }
        }
        Ok(tickets)
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Category, Priority, TicketAnalyzer};

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn analyze(message: &str) -> AnalysisResult {
        TicketAnalyzer::builtin().analyze(message)
    }

    #[tokio::test]
    async fn insert_and_get_by_id() {
        let db = test_db().await;
        let record = db
            .insert_ticket(&analyze("my payment failed and this is urgent"))
            .await
            .unwrap();

        let fetched = db.get_ticket(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.message, "my payment failed and this is urgent");
        assert_eq!(fetched.category, Category::Billing);
        assert_eq!(fetched.priority, Priority::P1);
        assert!(fetched.urgency);
        assert_eq!(fetched.keywords, ["payment", "urgent"]);
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn get_by_id_not_found() {
        let db = test_db().await;
        assert!(db.get_ticket(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_keywords_roundtrip() {
        let db = test_db().await;
        let record = db.insert_ticket(&analyze("xyzzy plugh qux")).await.unwrap();
        let fetched = db.get_ticket(record.id).await.unwrap().unwrap();
        assert!(fetched.keywords.is_empty());
        assert_eq!(fetched.category, Category::Other);
        assert!(!fetched.urgency);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let db = test_db().await;
        let first = db.insert_ticket(&analyze("first payment")).await.unwrap();
        let second = db.insert_ticket(&analyze("second login")).await.unwrap();
        let third = db.insert_ticket(&analyze("third crash")).await.unwrap();

        let ids: Vec<Uuid> = db
            .list_tickets()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn list_empty() {
        let db = test_db().await;
        assert!(db.list_tickets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_skips_unparseable_rows() {
        let db = test_db().await;
        db.insert_ticket(&analyze("payment")).await.unwrap();
        db.conn()
            .execute(
                "INSERT INTO tickets (id, message, category, priority, urgency, keywords, confidence, created_at)
                 VALUES ('not-a-uuid', 'm', 'Shipping', 'P9', 0, '[]', 0.3, '2026-01-01T00:00:00.000000Z')",
                (),
            )
            .await
            .unwrap();

        let tickets = db.list_tickets().await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].message, "payment");
    }

    #[tokio::test]
    async fn open_local_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("dir").join("tickets.db");
        let db = LibSqlBackend::new_local(&db_path).await.unwrap();
        db.insert_ticket(&analyze("refund please")).await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        // run_migrations already ran in new_memory. Running again should be fine.
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn store_is_usable_from_spawned_tasks() {
        let db: Arc<dyn TicketStore> = Arc::new(test_db().await);
        let task_db = Arc::clone(&db);
        tokio::spawn(async move {
            task_db.run_migrations().await?;
            task_db.insert_ticket(&analyze("refund please")).await
        })
        .await
        .unwrap()
        .unwrap();
        assert_eq!(db.list_tickets().await.unwrap().len(), 1);
    }

    #[test]
    fn datetime_format_is_fixed_width() {
        let a = DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let b = DateTime::parse_from_rfc3339("2026-01-01T00:00:00.5Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(format_datetime(&a).len(), format_datetime(&b).len());
        assert!(format_datetime(&a) < format_datetime(&b));
        assert_eq!(parse_datetime(&format_datetime(&b)).unwrap(), b);
    }
}
