use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::response::success;
use super::AppState;

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "movies": state.movies.catalog.len(),
        "visual_treats": state.visual_treats.catalog.len(),
        "cached_views": state.view_cache.entry_count().await,
    }))
}

/// 清空视图缓存
pub async fn clear_cache(State(state): State<AppState>) -> impl IntoResponse {
    state.view_cache.clear();
    tracing::info!("View cache cleared");

    success(json!({
        "message": "View cache cleared",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
