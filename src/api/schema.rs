//! Request and response bodies for the ticket REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analyzer::{Category, Priority};
use crate::error::ApiError;
use crate::store::TicketRecord;

/// Body of `POST /tickets/analyze`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub message: String,
}

impl AnalyzeRequest {
    /// Reject blank messages and messages longer than `max_chars`.
    ///
    /// The message itself is passed on untouched; trimming is only used to
    /// decide whether it is blank.
    pub fn validate(&self, max_chars: usize) -> Result<&str, ApiError> {
        if self.message.trim().is_empty() {
            return Err(ApiError::Validation("message must not be empty".into()));
        }
        let chars = self.message.chars().count();
        if chars > max_chars {
            return Err(ApiError::Validation(format!(
                "message is {chars} characters, limit is {max_chars}"
            )));
        }
        Ok(&self.message)
    }
}

/// Result returned after analyzing a single ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub category: Category,
    pub priority: Priority,
    pub urgency: bool,
    pub keywords: Vec<String>,
    pub confidence: f64,
    pub message: String,
}

impl From<TicketRecord> for AnalyzeResponse {
    fn from(t: TicketRecord) -> Self {
        Self {
            id: t.id,
            category: t.category,
            priority: t.priority,
            urgency: t.urgency,
            keywords: t.keywords,
            confidence: t.confidence,
            message: t.message,
        }
    }
}

/// Row of the ticket history list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketListItem {
    pub id: Uuid,
    pub message: String,
    pub category: Category,
    pub priority: Priority,
    pub urgency: bool,
    pub keywords: Vec<String>,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl From<TicketRecord> for TicketListItem {
    fn from(t: TicketRecord) -> Self {
        Self {
            id: t.id,
            message: t.message,
            category: t.category,
            priority: t.priority,
            urgency: t.urgency,
            keywords: t.keywords,
            confidence: t.confidence,
            created_at: t.created_at,
        }
    }
}
