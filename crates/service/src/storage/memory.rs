//! In-memory blob store backend, for tests and single-process dev setups.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use super::{BlobError, BlobStore};

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError> {
        self.objects.insert(key.to_string(), data);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        self.objects
            .get(key)
            .map(|v| v.value().clone())
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.objects.remove(key);
        Ok(())
    }
}
