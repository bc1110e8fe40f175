use axum::{
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiResult;
use super::response::{success, ApiResponse};
use super::{AppState, BrowsePage};
use crate::models::{ActiveFilter, ContentRecord, Facet, SortKey, ViewMode, ViewState};
use crate::services::view_engine::{self, FacetOption, Neighbors};
use crate::services::ViewCache;

/// 浏览结果
#[derive(Debug, Serialize)]
pub struct BrowseResponse<R: Serialize> {
    pub items: Vec<R>,
    pub total: usize,
    /// 规范查询串，前端据此更新地址栏
    pub query: String,
    pub view_mode: ViewMode,
    pub sort: SortKey,
    pub search: String,
    pub has_active_filters: bool,
    pub active_filters: Vec<ActiveFilter>,
}

#[derive(Debug, Serialize)]
pub struct FacetOptions {
    pub facet: Facet,
    pub param: &'static str,
    pub options: Vec<FacetOption>,
}

#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub facets: Vec<FacetOptions>,
    pub sort_options: Vec<SortKey>,
    pub default_sort: SortKey,
    pub year_range: Option<(i32, i32)>,
    pub score_range: Option<(f32, f32)>,
    /// 前端搜索框的防抖窗口（毫秒）
    pub search_debounce_ms: u64,
}

/// 解析查询串并取得（可能已缓存的）结果下标
async fn resolve_view<R: ContentRecord>(
    page: &BrowsePage<R>,
    cache: &ViewCache,
    raw_query: Option<&str>,
) -> (ViewState, String, Arc<Vec<usize>>) {
    let view = page.codec.deserialize(raw_query.unwrap_or(""));
    let canonical = page.codec.serialize(&view);

    let indices = cache
        .get_or_compute(page.name, &canonical, || {
            view_engine::apply_view_indices(page.catalog.records(), &view)
        })
        .await;

    (view, canonical, indices)
}

async fn browse<R: ContentRecord>(
    page: &BrowsePage<R>,
    cache: &ViewCache,
    raw_query: Option<&str>,
) -> ApiResponse<BrowseResponse<R>> {
    let (view, canonical, indices) = resolve_view(page, cache, raw_query).await;

    let records = page.catalog.records();
    let items: Vec<R> = indices.iter().map(|&i| records[i].clone()).collect();

    tracing::debug!(
        "Browse {} [{}] -> {} of {} records",
        page.name,
        canonical,
        items.len(),
        records.len()
    );

    let response = BrowseResponse {
        total: items.len(),
        items,
        query: canonical,
        view_mode: view.view_mode,
        sort: view.sort,
        has_active_filters: view.filters.has_active_filters(),
        active_filters: view.filters.active_filters(),
        search: view.search,
    };

    // 空结果是正常的空状态，不是错误
    if response.items.is_empty() {
        ApiResponse::success_with_message(response, "No results match the current filters")
    } else {
        ApiResponse::success(response)
    }
}

fn filter_options<R: ContentRecord>(page: &BrowsePage<R>) -> FilterOptionsResponse {
    let defaults = page.codec.defaults();
    let records = page.catalog.records();

    let facets = defaults
        .facets
        .iter()
        .map(|&facet| FacetOptions {
            facet,
            param: facet.param(),
            options: view_engine::facet_options(records, facet),
        })
        .collect();

    FilterOptionsResponse {
        facets,
        sort_options: defaults.sorts.clone(),
        default_sort: defaults.sort,
        year_range: defaults.year_range.map(|r| (r.start(), r.end())),
        score_range: defaults.score_range.map(|r| (r.min(), r.max())),
        search_debounce_ms: page.debounce_window.as_millis() as u64,
    }
}

fn get_record<'a, R: ContentRecord>(page: &'a BrowsePage<R>, id: &str) -> ApiResult<&'a R> {
    page.catalog
        .get(id)
        .ok_or_else(|| crate::api_error!(NotFound, format!("{} record '{}' not found", page.name, id)))
}

async fn neighbors<R: ContentRecord>(
    page: &BrowsePage<R>,
    cache: &ViewCache,
    id: &str,
    raw_query: Option<&str>,
) -> ApiResult<Option<Neighbors>> {
    get_record(page, id)?;

    let (_, _, indices) = resolve_view(page, cache, raw_query).await;
    let records = page.catalog.records();
    let view: Vec<&R> = indices.iter().map(|&i| &records[i]).collect();

    Ok(view_engine::neighbors(&view, id))
}

pub async fn browse_movies(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    browse(&state.movies, &state.view_cache, query.as_deref()).await
}

pub async fn browse_visual_treats(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    browse(&state.visual_treats, &state.view_cache, query.as_deref()).await
}

pub async fn movie_filter_options(State(state): State<AppState>) -> impl IntoResponse {
    success(filter_options(&state.movies))
}

pub async fn visual_treat_filter_options(State(state): State<AppState>) -> impl IntoResponse {
    success(filter_options(&state.visual_treats))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let movie = get_record(&state.movies, &id)?;
    Ok(success(movie.clone()))
}

pub async fn get_visual_treat(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let treat = get_record(&state.visual_treats, &id)?;
    Ok(success(treat.clone()))
}

pub async fn movie_neighbors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<impl IntoResponse> {
    let around = neighbors(&state.movies, &state.view_cache, &id, query.as_deref()).await?;
    Ok(success(around))
}

pub async fn visual_treat_neighbors(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<impl IntoResponse> {
    let around = neighbors(&state.visual_treats, &state.view_cache, &id, query.as_deref()).await?;
    Ok(success(around))
}
