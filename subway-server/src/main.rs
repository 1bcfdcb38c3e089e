use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subway_server::config::ServerConfig;
use subway_server::seed::Seed;
use subway_server::service::SubwayService;
use subway_server::store::MemoryStore;
use subway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let service = SubwayService::new(MemoryStore::new(), config.traversal);

    // Load the initial network, if any
    if let Some(path) = &config.seed_path {
        info!(path = %path.display(), "loading seed");
        Seed::from_path(path)?.apply(&service)?;
    }

    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, traversal = ?config.traversal, "subway server listening");
    info!("  GET    /health");
    info!("  POST   /stations, GET /stations, DELETE /stations/:id");
    info!("  POST   /lines, GET /lines, GET|PUT|DELETE /lines/:id");
    info!("  POST   /lines/:id/sections, DELETE /lines/:id/sections?station_id=");
    info!("  GET    /paths?source=&target=&age=");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
