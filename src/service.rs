//! Ticket service — runs the analyzer and persists its output.
//!
//! Sits between the HTTP handlers and the analyzer/store so neither of
//! those knows about the other.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::analyzer::TicketAnalyzer;
use crate::error::Result;
use crate::store::{TicketRecord, TicketStore};

pub struct TicketService {
    analyzer: Arc<TicketAnalyzer>,
    store: Arc<dyn TicketStore>,
}

impl TicketService {
    pub fn new(analyzer: Arc<TicketAnalyzer>, store: Arc<dyn TicketStore>) -> Self {
        Self { analyzer, store }
    }

    /// Analyze a validated message and store the result.
    pub async fn analyze_and_store(&self, message: &str) -> Result<TicketRecord> {
        let result = self.analyzer.analyze(message);
        let record = self.store.insert_ticket(&result).await?;
        info!(
            id = %record.id,
            category = %record.category,
            priority = %record.priority,
            urgency = record.urgency,
            "Ticket analyzed and stored"
        );
        Ok(record)
    }

    /// Stored tickets, newest first.
    pub async fn list_tickets(&self) -> Result<Vec<TicketRecord>> {
        Ok(self.store.list_tickets().await?)
    }

    pub async fn get_ticket(&self, id: Uuid) -> Result<Option<TicketRecord>> {
        Ok(self.store.get_ticket(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::analyzer::{AnalysisResult, Category, Priority};
    use crate::error::{DatabaseError, Error};
    use crate::store::LibSqlBackend;

    async fn service() -> TicketService {
        let store: Arc<dyn TicketStore> = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        TicketService::new(Arc::new(TicketAnalyzer::builtin()), store)
    }

    /// Store whose every call fails.
    struct BrokenStore;

    #[async_trait]
    impl TicketStore for BrokenStore {
        async fn run_migrations(&self) -> std::result::Result<(), DatabaseError> {
            Ok(())
        }
        async fn insert_ticket(
            &self,
            _result: &AnalysisResult,
        ) -> std::result::Result<TicketRecord, DatabaseError> {
            Err(DatabaseError::Query("disk full".into()))
        }
        async fn get_ticket(
            &self,
            _id: Uuid,
        ) -> std::result::Result<Option<TicketRecord>, DatabaseError> {
            Err(DatabaseError::Query("disk full".into()))
        }
        async fn list_tickets(&self) -> std::result::Result<Vec<TicketRecord>, DatabaseError> {
            Err(DatabaseError::Query("disk full".into()))
        }
    }

    #[tokio::test]
    async fn analyze_and_store_persists_result() {
        let service = service().await;
        let record = service
            .analyze_and_store("I want a refund for my broken order")
            .await
            .unwrap();
        assert_eq!(record.category, Category::Billing);
        assert_eq!(record.priority, Priority::P1);

        let fetched = service.get_ticket(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, record.id);
        assert_eq!(fetched.keywords, record.keywords);
    }

    #[tokio::test]
    async fn list_returns_newest_first() {
        let service = service().await;
        let older = service.analyze_and_store("payment failed").await.unwrap();
        let newer = service.analyze_and_store("please add a dark mode option").await.unwrap();

        let tickets = service.list_tickets().await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].id, newer.id);
        assert_eq!(tickets[1].id, older.id);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_database_error() {
        let service = TicketService::new(Arc::new(TicketAnalyzer::builtin()), Arc::new(BrokenStore));
        let err = service.analyze_and_store("payment").await.unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert!(service.list_tickets().await.is_err());
    }
}
