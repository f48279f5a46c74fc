use async_trait::async_trait;
use uuid::Uuid;

use super::domain::DiagramRecord;
use super::errors::DiagramError;

/// Repository abstraction for diagram metadata persistence.
///
/// Implementations run each call within a connection scoped to that one
/// logical operation; nothing is leaked across requests.
#[async_trait]
pub trait DiagramRepository: Send + Sync {
    /// Insert a new record; fails if the id collides.
    async fn insert(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DiagramRecord>, DiagramError>;
    /// All records, order unspecified.
    async fn list_all(&self) -> Result<Vec<DiagramRecord>, DiagramError>;
    /// Full-row update; `NotFound` if the record vanished (concurrent delete).
    async fn update(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError>;
    /// Idempotent delete.
    async fn delete(&self, id: Uuid) -> Result<(), DiagramError>;
}

/// Simple in-memory repository for tests and doc examples.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockDiagramRepository {
        records: Mutex<HashMap<Uuid, DiagramRecord>>,
    }

    #[async_trait]
    impl DiagramRepository for MockDiagramRepository {
        async fn insert(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError> {
            let mut records = self.records.lock().unwrap();
            if records.contains_key(&record.id) {
                return Err(DiagramError::Repository(format!("duplicate id {}", record.id)));
            }
            records.insert(record.id, record.clone());
            Ok(record)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<DiagramRecord>, DiagramError> {
            let records = self.records.lock().unwrap();
            Ok(records.get(&id).cloned())
        }

        async fn list_all(&self) -> Result<Vec<DiagramRecord>, DiagramError> {
            let records = self.records.lock().unwrap();
            Ok(records.values().cloned().collect())
        }

        async fn update(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError> {
            let mut records = self.records.lock().unwrap();
            if !records.contains_key(&record.id) {
                return Err(DiagramError::NotFound);
            }
            records.insert(record.id, record.clone());
            Ok(record)
        }

        async fn delete(&self, id: Uuid) -> Result<(), DiagramError> {
            let mut records = self.records.lock().unwrap();
            records.remove(&id);
            Ok(())
        }
    }
}
