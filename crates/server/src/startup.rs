use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::diagram::repo::seaorm::SeaOrmDiagramRepository;
use service::diagram::DiagramService;
use service::storage::{self, BlobStore as _};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

/// Public entry: wire up capabilities, run migrations, serve HTTP.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_default();

    let cfg = configs::AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    // Relational half: pooled connection + schema brought up to date.
    let db = models::db::connect_with_config(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database connected, migrations applied");

    // Blob half: the store is an explicit capability handed to the
    // coordinator, never a process-wide singleton.
    let blobs = storage::from_config(&cfg.blob).await?;
    info!(backend = blobs.name(), bucket = %cfg.blob.bucket, "blob store ready");

    let repo = Arc::new(SeaOrmDiagramRepository::new(db));
    let diagrams = Arc::new(DiagramService::new(repo, blobs));
    let state = AppState { diagrams };

    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "starting diagram service");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
