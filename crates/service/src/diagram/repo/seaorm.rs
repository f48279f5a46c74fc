use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::diagram::domain::DiagramRecord;
use crate::diagram::errors::DiagramError;
use crate::diagram::repository::DiagramRepository;

/// sea-orm backed repository over the `diagram` table.
pub struct SeaOrmDiagramRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDiagramRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl DiagramRepository for SeaOrmDiagramRepository {
    async fn insert(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError> {
        let created = models::diagram::insert(&self.db, record.into()).await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<DiagramRecord>, DiagramError> {
        let found = models::diagram::find_by_id(&self.db, id).await?;
        Ok(found.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<DiagramRecord>, DiagramError> {
        let all = models::diagram::list_all(&self.db).await?;
        Ok(all.into_iter().map(Into::into).collect())
    }

    async fn update(&self, record: DiagramRecord) -> Result<DiagramRecord, DiagramError> {
        let updated = models::diagram::update(&self.db, record.into()).await?;
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DiagramError> {
        models::diagram::delete_by_id(&self.db, id).await?;
        Ok(())
    }
}
