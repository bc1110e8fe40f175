use std::net::SocketAddr;
use std::path::PathBuf;

use media_browse_backend::api;
use media_browse_backend::services::ConfigManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Load browse configuration
    let config_path = std::env::var("BROWSE_CONFIG").ok().map(PathBuf::from);
    let config_manager = ConfigManager::load(config_path).await?;
    let config = config_manager.config();

    // Load catalogs
    let state = api::AppState::load(config).await?;
    tracing::info!(
        "📚 Loaded {} movies and {} visual treats",
        state.movies.catalog.len(),
        state.visual_treats.catalog.len()
    );

    let app = api::router(state);

    // Run the server
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("🚀 Server listening on {}", addr);
    tracing::info!(
        "🗂️ View cache: capacity {}, ttl {}s",
        config.view_cache.capacity,
        config.view_cache.ttl_secs
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
