use sea_orm::{entity::prelude::*, DatabaseConnection, DbErr, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Relational half of a diagram. The payload itself lives in the blob store
/// under `object_key`; this row must never outlive that blob.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "diagram")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub object_key: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

/// Build a fresh model with both timestamps set to now.
pub fn new_model(id: Uuid, name: &str, owner_id: Uuid, object_key: &str) -> Model {
    let now = Utc::now().into();
    Model {
        id,
        name: name.to_string(),
        owner_id,
        object_key: object_key.to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub async fn insert(db: &DatabaseConnection, m: Model) -> Result<Model, ModelError> {
    validate_name(&m.name)?;
    let am = ActiveModel {
        id: Set(m.id),
        name: Set(m.name),
        owner_id: Set(m.owner_id),
        object_key: Set(m.object_key),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Model>, ModelError> {
    Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Entity::find().all(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Full-row update; fails with `NotFound` when the row vanished underneath
/// (concurrent delete).
pub async fn update(db: &DatabaseConnection, m: Model) -> Result<Model, ModelError> {
    validate_name(&m.name)?;
    let am = ActiveModel {
        id: Set(m.id),
        name: Set(m.name),
        owner_id: Set(m.owner_id),
        object_key: Set(m.object_key),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    };
    match am.update(db).await {
        Ok(updated) => Ok(updated),
        Err(DbErr::RecordNotUpdated) => {
            Err(ModelError::NotFound(format!("diagram {}", m.id)))
        }
        Err(e) => Err(ModelError::Db(e.to_string())),
    }
}

/// Idempotent: deleting an absent id is not an error.
pub async fn delete_by_id(db: &DatabaseConnection, id: Uuid) -> Result<(), ModelError> {
    Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_validation() {
        assert!(validate_name("Login Flow").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn new_model_timestamps_equal() {
        let id = Uuid::new_v4();
        let m = new_model(id, "d", Uuid::new_v4(), "k.json");
        assert_eq!(m.created_at, m.updated_at);
        assert_eq!(m.id, id);
    }
}
