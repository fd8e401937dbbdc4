//! `TicketStore` trait — async interface for persisting analysis results.

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analyzer::{AnalysisResult, Category, Priority};
use crate::error::DatabaseError;

/// A persisted analysis result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRecord {
    pub id: Uuid,
    pub message: String,
    pub category: Category,
    pub priority: Priority,
    pub urgency: bool,
    pub keywords: Vec<String>,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl TicketRecord {
    /// Stamp an analysis result with a fresh id and creation time.
    ///
    /// The timestamp is truncated to microseconds, the precision it is
    /// stored with.
    pub fn from_analysis(result: &AnalysisResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: result.message().to_string(),
            category: result.category(),
            priority: result.priority(),
            urgency: result.urgency(),
            keywords: result.keywords().to_vec(),
            confidence: result.confidence(),
            created_at: Utc::now().trunc_subsecs(6),
        }
    }
}

/// Backend-agnostic ticket persistence.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Persist an analysis result. Returns the stored record.
    async fn insert_ticket(&self, result: &AnalysisResult) -> Result<TicketRecord, DatabaseError>;

    /// Get a ticket by ID.
    async fn get_ticket(&self, id: Uuid) -> Result<Option<TicketRecord>, DatabaseError>;

    /// All tickets, newest first.
    async fn list_tickets(&self) -> Result<Vec<TicketRecord>, DatabaseError>;
}
