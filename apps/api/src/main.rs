use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cv_builder::config::Config;
use cv_builder::persistence::{self, FileSnapshotStore};
use cv_builder::routes::build_router;
use cv_builder::state::AppState;
use cv_builder::CvStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("cv_builder={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV builder v{}", env!("CARGO_PKG_VERSION"));

    // Local key-value slot for the CV snapshot
    let slot = FileSnapshotStore::new(&config.snapshot_dir);
    info!("Snapshot directory: {}", slot.dir().display());

    let fresh = CvStore::with_defaults(&config.store_defaults());
    let store = persistence::restore_or(
        &slot,
        &config.snapshot_key,
        fresh,
        config.recalculate_on_restore,
    )
    .await?;
    info!(
        "CV loaded: completion {}%, ATS {}",
        store.completion_percentage(),
        store.ats_score()
    );

    let state = AppState::new(store, Arc::new(slot), config.clone());

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
