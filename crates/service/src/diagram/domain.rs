use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Diagram metadata (business view). Payload bytes are not part of the
/// record; list responses serialize this type and therefore never carry one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramRecord {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub object_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A record merged with its resolved payload. Constructed on demand for
/// single-item responses, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydratedDiagram {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub object_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl HydratedDiagram {
    pub fn from_record(record: DiagramRecord, payload: serde_json::Value) -> Self {
        Self {
            id: record.id,
            name: record.name,
            owner_id: record.owner_id,
            object_key: record.object_key,
            created_at: record.created_at,
            updated_at: record.updated_at,
            payload,
        }
    }
}

/// Creation input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDiagramInput {
    pub name: String,
    pub payload: serde_json::Value,
    pub owner_id: Uuid,
}

/// Update input; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDiagramInput {
    pub name: Option<String>,
    pub payload: Option<serde_json::Value>,
}

impl From<models::diagram::Model> for DiagramRecord {
    fn from(m: models::diagram::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            owner_id: m.owner_id,
            object_key: m.object_key,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<DiagramRecord> for models::diagram::Model {
    fn from(r: DiagramRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            owner_id: r.owner_id,
            object_key: r.object_key,
            created_at: r.created_at.into(),
            updated_at: r.updated_at.into(),
        }
    }
}
