//! Filesystem blob store backend.
//!
//! Objects live as plain files under `<root>/<bucket>/<key>`. Keys are opaque
//! file names; hierarchy inside a key is not supported.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::{BlobError, BlobStore};

pub struct FsBlobStore {
    bucket_dir: PathBuf,
}

impl FsBlobStore {
    /// Open the store, creating the bucket directory if missing.
    pub async fn new(root_dir: &str, bucket: &str) -> anyhow::Result<Self> {
        let bucket_dir = PathBuf::from(root_dir).join(bucket);
        fs::create_dir_all(&bucket_dir)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create bucket dir {}: {e}", bucket_dir.display()))?;
        Ok(Self { bucket_dir })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.bucket_dir.join(key)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError> {
        fs::write(self.object_path(key), &data)
            .await
            .map_err(|e| BlobError::Unavailable(format!("write {key}: {e}")))
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        match fs::read(self.object_path(key)).await {
            Ok(bytes) => Ok(Bytes::from(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobError::NotFound(key.to_string())),
            Err(e) => Err(BlobError::Unavailable(format!("read {key}: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Unavailable(format!("delete {key}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store() -> (FsBlobStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("fs_blob_store_{}", uuid::Uuid::new_v4()));
        let store = FsBlobStore::new(root.to_str().unwrap(), "uml-diagrams").await.unwrap();
        (store, root)
    }

    #[tokio::test]
    async fn roundtrip_and_idempotent_delete() {
        let (store, root) = temp_store().await;

        store.put("d.json", Bytes::from_static(b"{\"type\":\"class\"}")).await.unwrap();
        let got = store.get("d.json").await.unwrap();
        assert_eq!(got, Bytes::from_static(b"{\"type\":\"class\"}"));

        store.delete("d.json").await.unwrap();
        assert!(matches!(store.get("d.json").await, Err(BlobError::NotFound(_))));
        store.delete("d.json").await.unwrap();

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let (store, root) = temp_store().await;
        assert!(matches!(store.get("absent.json").await, Err(BlobError::NotFound(_))));
        let _ = fs::remove_dir_all(&root).await;
    }
}
