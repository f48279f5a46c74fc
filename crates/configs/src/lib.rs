use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub blob: BlobConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8001, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Where diagram payload blobs live. `backend` selects one of the
/// implementations in the service crate: `memory`, `filesystem` or `http`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlobConfig {
    #[serde(default = "default_blob_backend")]
    pub backend: String,
    #[serde(default = "default_blob_bucket")]
    pub bucket: String,
    /// Root directory for the `filesystem` backend.
    #[serde(default = "default_blob_root_dir")]
    pub root_dir: String,
    /// Base URL of an S3-compatible object endpoint for the `http` backend.
    #[serde(default)]
    pub endpoint: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: default_blob_backend(),
            bucket: default_blob_bucket(),
            root_dir: default_blob_root_dir(),
            endpoint: String::new(),
        }
    }
}

fn default_blob_backend() -> String { "filesystem".into() }
fn default_blob_bucket() -> String { "uml-diagrams".into() }
fn default_blob_root_dir() -> String { "data/blobs".into() }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load config.toml (if any), fill gaps from the environment and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.blob.normalize_from_env();
        self.blob.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if let Ok(host) = std::env::var("SERVER_HOST") {
            if !host.trim().is_empty() { self.host = host; }
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            _ => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML omits the URL in most deployments; DATABASE_URL wins there.
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        Ok(())
    }
}

impl BlobConfig {
    pub fn normalize_from_env(&mut self) {
        if let Ok(backend) = std::env::var("BLOB_BACKEND") {
            if !backend.trim().is_empty() { self.backend = backend; }
        }
        if let Ok(bucket) = std::env::var("BLOB_BUCKET") {
            if !bucket.trim().is_empty() { self.bucket = bucket; }
        }
        if let Ok(root) = std::env::var("BLOB_ROOT_DIR") {
            if !root.trim().is_empty() { self.root_dir = root; }
        }
        if let Ok(endpoint) = std::env::var("BLOB_ENDPOINT") {
            if !endpoint.trim().is_empty() { self.endpoint = endpoint; }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend.as_str() {
            "memory" => Ok(()),
            "filesystem" => {
                if self.root_dir.trim().is_empty() {
                    return Err(anyhow!("blob.root_dir is required for the filesystem backend"));
                }
                Ok(())
            }
            "http" => {
                if self.endpoint.trim().is_empty() {
                    return Err(anyhow!("blob.endpoint is required for the http backend"));
                }
                let lower = self.endpoint.to_lowercase();
                if !(lower.starts_with("http://") || lower.starts_with("https://")) {
                    return Err(anyhow!("blob.endpoint must start with http:// or https://"));
                }
                Ok(())
            }
            other => Err(anyhow!("unknown blob.backend '{other}' (memory|filesystem|http)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_sections_parse() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9001

            [database]
            url = "postgres://u:p@localhost/diagrams"
            max_connections = 5

            [blob]
            backend = "http"
            endpoint = "http://localhost:9000"
            bucket = "diagrams"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9001);
        assert_eq!(cfg.database.max_connections, 5);
        assert_eq!(cfg.database.min_connections, 2);
        cfg.database.validate().unwrap();
        cfg.blob.validate().unwrap();
    }

    #[test]
    fn blob_defaults() {
        let blob = BlobConfig::default();
        assert_eq!(blob.backend, "filesystem");
        assert_eq!(blob.bucket, "uml-diagrams");
        blob.validate().unwrap();
    }

    #[test]
    fn unknown_blob_backend_rejected() {
        let blob = BlobConfig { backend: "tape".into(), ..BlobConfig::default() };
        assert!(blob.validate().is_err());
    }

    #[test]
    fn http_backend_requires_endpoint() {
        let blob = BlobConfig { backend: "http".into(), ..BlobConfig::default() };
        assert!(blob.validate().is_err());
    }
}
