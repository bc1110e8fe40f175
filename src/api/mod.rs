pub mod browse;
pub mod error;
pub mod health;
pub mod response;

use axum::{routing::get, Router};
use chrono::Datelike;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::models::{ContentRecord, Movie, ViewDefaults, VisualTreat};
use crate::services::{
    BrowseConfig, BrowseError, BrowseSession, Catalog, JsonFileSource, QueryCodec, RecordSource,
    ViewCache,
};

/// 一个可浏览的目录及其查询串编解码器
#[derive(Debug)]
pub struct BrowsePage<R> {
    /// 目录名，同时用作缓存键前缀
    pub name: &'static str,
    pub catalog: Arc<Catalog<R>>,
    pub codec: QueryCodec,
    /// 搜索输入的防抖窗口
    pub debounce_window: Duration,
}

impl<R: ContentRecord> BrowsePage<R> {
    pub fn new(
        name: &'static str,
        catalog: Catalog<R>,
        defaults: ViewDefaults,
        debounce_window: Duration,
    ) -> Self {
        Self {
            name,
            catalog: Arc::new(catalog),
            codec: QueryCodec::new(defaults),
            debounce_window,
        }
    }

    pub async fn load(
        name: &'static str,
        source: &dyn RecordSource<R>,
        defaults: ViewDefaults,
        debounce_window: Duration,
    ) -> Result<Self, BrowseError> {
        let catalog = Catalog::load(source).await?;
        Ok(Self::new(name, catalog, defaults, debounce_window))
    }

    /// 为一个页面路径创建浏览会话，共享目录快照与防抖窗口
    pub fn session(&self, path: impl Into<String>) -> BrowseSession<R> {
        BrowseSession::new(
            Arc::clone(&self.catalog),
            self.codec.clone(),
            path,
            self.debounce_window,
        )
    }
}

#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<BrowsePage<Movie>>,
    pub visual_treats: Arc<BrowsePage<VisualTreat>>,
    pub view_cache: ViewCache,
}

impl AppState {
    /// 按配置加载两个目录；年份上限在这里取一次当前年份
    pub async fn load(config: &BrowseConfig) -> Result<Self, BrowseError> {
        let current_year = chrono::Utc::now().year();

        let movies = BrowsePage::load(
            "movies",
            &JsonFileSource::<Movie>::new(&config.movies_path),
            ViewDefaults::movies(current_year),
            config.debounce_window(),
        )
        .await?;

        let visual_treats = BrowsePage::load(
            "visual-treats",
            &JsonFileSource::<VisualTreat>::new(&config.visual_treats_path),
            ViewDefaults::visual_treats(current_year),
            config.debounce_window(),
        )
        .await?;

        Ok(Self {
            movies: Arc::new(movies),
            visual_treats: Arc::new(visual_treats),
            view_cache: ViewCache::new(&config.view_cache),
        })
    }
}

/// 构建全部路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Media Browse Backend API v1.0" }))
        // Health
        .route("/api/health", get(health::health_check))
        .route("/api/cache/clear", axum::routing::post(health::clear_cache))
        // Movies
        .route("/api/movies", get(browse::browse_movies))
        .route("/api/movies/filters", get(browse::movie_filter_options))
        .route("/api/movies/:id", get(browse::get_movie))
        .route("/api/movies/:id/neighbors", get(browse::movie_neighbors))
        // Visual treats
        .route("/api/visual-treats", get(browse::browse_visual_treats))
        .route("/api/visual-treats/filters", get(browse::visual_treat_filter_options))
        .route("/api/visual-treats/:id", get(browse::get_visual_treat))
        .route("/api/visual-treats/:id/neighbors", get(browse::visual_treat_neighbors))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
        .with_state(state)
}
