use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::storage::{BlobError, BlobStore};

use super::domain::{CreateDiagramInput, DiagramRecord, HydratedDiagram, UpdateDiagramInput};
use super::errors::DiagramError;
use super::object_key::object_key;
use super::repository::DiagramRepository;

/// Coordinator sequencing metadata and blob operations into one logical
/// diagram operation.
///
/// Creation writes the blob first and commits metadata second; a failed
/// metadata write triggers a best-effort delete of the just-written blob so
/// no row ever points at a blob that was never committed. Deletion removes
/// the blob first and aborts on a non-absence failure so the row keeps
/// referencing its still-live blob. The compensation is best-effort: when it
/// fails, the orphaned blob is logged and the primary error surfaces
/// unchanged. Both stores are injected capabilities; callers never touch
/// them directly.
pub struct DiagramService {
    repo: Arc<dyn DiagramRepository>,
    blobs: Arc<dyn BlobStore>,
    // Serializes update/delete on one id; concurrent ids never contend.
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl DiagramService {
    pub fn new(repo: Arc<dyn DiagramRepository>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { repo, blobs, locks: DashMap::new() }
    }

    async fn lock_id(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    fn serialize_payload(payload: &serde_json::Value) -> Result<bytes::Bytes, DiagramError> {
        let bytes = serde_json::to_vec(payload)
            .map_err(|e| DiagramError::Validation(format!("payload not serializable: {e}")))?;
        Ok(bytes.into())
    }

    fn deserialize_payload(key: &str, bytes: &[u8]) -> Result<serde_json::Value, DiagramError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DiagramError::Integrity(format!("undecodable blob {key}: {e}")))
    }

    /// Create a diagram: blob first, metadata second.
    #[instrument(skip(self, input), fields(name = %input.name, owner_id = %input.owner_id))]
    pub async fn create(&self, input: CreateDiagramInput) -> Result<HydratedDiagram, DiagramError> {
        if input.name.trim().is_empty() {
            return Err(DiagramError::Validation("name required".into()));
        }
        let id = Uuid::new_v4();
        let key = object_key(id);
        let bytes = Self::serialize_payload(&input.payload)?;

        // Step 1: payload into the blob store. Failure here leaves nothing
        // behind; no metadata row was created yet.
        self.blobs
            .put(&key, bytes)
            .await
            .map_err(|e| DiagramError::Storage(e.to_string()))?;

        // Step 2: commit metadata referencing the key. On failure, compensate
        // by deleting the orphaned blob; the insert error is what surfaces.
        let now = chrono::Utc::now();
        let record = DiagramRecord {
            id,
            name: input.name,
            owner_id: input.owner_id,
            object_key: key.clone(),
            created_at: now,
            updated_at: now,
        };
        let record = match self.repo.insert(record).await {
            Ok(r) => r,
            Err(primary) => {
                if let Err(comp) = self.blobs.delete(&key).await {
                    warn!(
                        object_key = %key,
                        error = %comp,
                        "compensating blob delete failed; orphaned blob remains"
                    );
                }
                return Err(primary);
            }
        };

        info!(diagram_id = %record.id, object_key = %key, "diagram_created");
        // The caller already holds the payload; no re-fetch needed.
        Ok(HydratedDiagram::from_record(record, input.payload))
    }

    /// Fetch one diagram and rehydrate its payload.
    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<HydratedDiagram, DiagramError> {
        let record = self.repo.find_by_id(id).await?.ok_or(DiagramError::NotFound)?;
        // A missing blob under live metadata is an integrity violation, not
        // an ordinary miss; the From impl keeps the two apart.
        let bytes = self.blobs.get(&record.object_key).await.map_err(DiagramError::from)?;
        let payload = Self::deserialize_payload(&record.object_key, &bytes)?;
        Ok(HydratedDiagram::from_record(record, payload))
    }

    /// All metadata records, payloads deliberately not hydrated.
    pub async fn list(&self) -> Result<Vec<DiagramRecord>, DiagramError> {
        self.repo.list_all().await
    }

    /// Update name and/or payload. The payload overwrites the existing object
    /// key; a blob failure aborts before any metadata write.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDiagramInput,
    ) -> Result<HydratedDiagram, DiagramError> {
        let _guard = self.lock_id(id).await;

        let mut record = self.repo.find_by_id(id).await?.ok_or(DiagramError::NotFound)?;

        if let Some(name) = input.name {
            if name.trim().is_empty() {
                return Err(DiagramError::Validation("name required".into()));
            }
            record.name = name;
        }

        if let Some(ref payload) = input.payload {
            let bytes = Self::serialize_payload(payload)?;
            // Same deterministic key; the previous version is overwritten.
            self.blobs
                .put(&record.object_key, bytes)
                .await
                .map_err(|e| DiagramError::Storage(e.to_string()))?;
        }

        record.updated_at = chrono::Utc::now();
        let record = self.repo.update(record).await?;
        info!(diagram_id = %record.id, "diagram_updated");

        // Single-item responses hydrate; reuse the provided payload, else
        // fetch the unchanged one.
        let payload = match input.payload {
            Some(p) => p,
            None => {
                let bytes =
                    self.blobs.get(&record.object_key).await.map_err(DiagramError::from)?;
                Self::deserialize_payload(&record.object_key, &bytes)?
            }
        };
        Ok(HydratedDiagram::from_record(record, payload))
    }

    /// Delete blob then metadata. A non-absence blob failure aborts so the
    /// record keeps referencing its still-undeleted blob.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DiagramError> {
        let guard = self.lock_id(id).await;

        let record = self.repo.find_by_id(id).await?.ok_or(DiagramError::NotFound)?;

        match self.blobs.delete(&record.object_key).await {
            Ok(()) => {}
            // Backends treat absence as success already; a stray NotFound
            // still means the blob is gone, so the row can go too.
            Err(BlobError::NotFound(_)) => {
                warn!(object_key = %record.object_key, "blob already absent on delete");
            }
            Err(BlobError::Unavailable(msg)) => return Err(DiagramError::Storage(msg)),
        }

        self.repo.delete(id).await?;
        info!(diagram_id = %id, object_key = %record.object_key, "diagram_deleted");

        drop(guard);
        // Drop the entry only while nobody else holds the same mutex;
        // otherwise a waiter and a newcomer could end up "locked" on two
        // different instances for one id.
        self.locks.remove_if(&id, |_, mutex| Arc::strong_count(mutex) == 1);
        Ok(())
    }
}
