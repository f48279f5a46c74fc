//! HTTP blob store backend.
//!
//! Talks to an S3-compatible object endpoint (MinIO and friends) with plain
//! `PUT`/`GET`/`DELETE` on `<endpoint>/<bucket>/<key>`. Request signing is a
//! deployment concern (sidecar/anonymous bucket); none is performed here.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;

use super::{BlobError, BlobStore};

pub struct HttpBlobStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBlobStore {
    pub fn new(endpoint: &str, bucket: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        let base_url = format!("{}/{}", endpoint.trim_end_matches('/'), bucket);
        Ok(Self { client, base_url })
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), BlobError> {
        let resp = self
            .client
            .put(self.object_url(key))
            .header("content-type", "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| BlobError::Unavailable(format!("put {key}: {e}")))?;
        if !resp.status().is_success() {
            return Err(BlobError::Unavailable(format!("put {key}: status {}", resp.status())));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        let resp = self
            .client
            .get(self.object_url(key))
            .send()
            .await
            .map_err(|e| BlobError::Unavailable(format!("get {key}: {e}")))?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(BlobError::NotFound(key.to_string())),
            s if s.is_success() => resp
                .bytes()
                .await
                .map_err(|e| BlobError::Unavailable(format!("get {key}: {e}"))),
            s => Err(BlobError::Unavailable(format!("get {key}: status {s}"))),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        let resp = self
            .client
            .delete(self.object_url(key))
            .send()
            .await
            .map_err(|e| BlobError::Unavailable(format!("delete {key}: {e}")))?;
        match resp.status() {
            // Already gone counts as deleted.
            StatusCode::NOT_FOUND => Ok(()),
            s if s.is_success() => Ok(()),
            s => Err(BlobError::Unavailable(format!("delete {key}: status {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_urls_join_cleanly() {
        let store = HttpBlobStore::new("http://localhost:9000/", "uml-diagrams").unwrap();
        assert_eq!(
            store.object_url("abc.json"),
            "http://localhost:9000/uml-diagrams/abc.json"
        );
    }
}
