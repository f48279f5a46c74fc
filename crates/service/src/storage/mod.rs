//! Blob store client.
//!
//! Diagram payloads are opaque bytes addressed by an object key inside a
//! fixed bucket. The coordinator depends only on the three-operation
//! [`BlobStore`] contract and receives an implementation as an injected
//! capability, never through a process-wide singleton.

pub mod memory;
pub mod filesystem;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Blob store failures the coordinator distinguishes between.
#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob not found: {0}")]
    NotFound(String),
    #[error("blob store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Backend name, for logs.
    fn name(&self) -> &str;

    /// Store `data` at `key`, overwriting any previous version.
    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError>;

    /// Fetch the bytes at `key`; `NotFound` if the key is absent.
    async fn get(&self, key: &str) -> Result<Bytes, BlobError>;

    /// Remove `key`. Idempotent: an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}

/// Build a blob store from configuration.
///
/// The filesystem backend creates its bucket directory up front, so a missing
/// namespace never surfaces as a per-request error later.
pub async fn from_config(cfg: &configs::BlobConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match cfg.backend.as_str() {
        "memory" => Ok(Arc::new(memory::MemoryBlobStore::new())),
        "filesystem" => {
            let store = filesystem::FsBlobStore::new(&cfg.root_dir, &cfg.bucket).await?;
            Ok(Arc::new(store))
        }
        "http" => Ok(Arc::new(http::HttpBlobStore::new(&cfg.endpoint, &cfg.bucket)?)),
        other => anyhow::bail!("unknown blob backend '{other}'"),
    }
}
