use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use applywise::config::Config;
use applywise::db::create_pool;
use applywise::routes::build_router;
use applywise::state::AppState;
use applywise::storage::S3DocumentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ApplyWise API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config).await?;

    let store = S3DocumentStore::from_config(&config).await;
    info!("Document store initialized (bucket: {})", config.s3_bucket);

    if let Some(dir) = &config.anecdotes_dir {
        info!("Default anecdotes directory: {}", dir.display());
    }

    let state = AppState {
        db,
        store: Arc::new(store),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
