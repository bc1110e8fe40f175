// 浏览会话 - 一个浏览页的状态持有者
//
// 持有当前 ViewState，把用户操作（排序、切换筛选项、输入搜索词……）
// 转换为新的视图，并给出需要推送的 URL。视图只通过这里修改，
// 筛选引擎本身不修改任何输入。

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::models::{
    ActiveFilter, ContentRecord, Facet, ScoreRange, SortKey, ViewMode, ViewState, YearRange,
};

use super::catalog::Catalog;
use super::debounce::Debouncer;
use super::query_codec::QueryCodec;
use super::url_sync::UrlSync;
use super::view_engine::{self, Neighbors};

/// 浏览会话，必须在 tokio 运行时内创建
pub struct BrowseSession<R> {
    catalog: Arc<Catalog<R>>,
    codec: QueryCodec,
    sync: UrlSync,
    view: ViewState,
    /// 输入框中的原始搜索词，尚未经过防抖
    search_input: String,
    debouncer: Debouncer<String>,
    settled: mpsc::UnboundedReceiver<String>,
}

impl<R: ContentRecord> BrowseSession<R> {
    pub fn new(
        catalog: Arc<Catalog<R>>,
        codec: QueryCodec,
        path: impl Into<String>,
        debounce_window: std::time::Duration,
    ) -> Self {
        let (debouncer, settled) = Debouncer::new(debounce_window);
        let view = codec.defaults().initial_view();

        Self {
            catalog,
            codec,
            sync: UrlSync::new(path),
            view,
            search_input: String::new(),
            debouncer,
            settled,
        }
    }

    /// 从页面 URL 初始化视图，只有第一次调用生效
    pub fn hydrate(&mut self, query: &str) -> bool {
        match self.sync.hydrate(&self.codec, query) {
            Some(view) => {
                self.search_input = view.search.clone();
                self.view = view;
                true
            }
            None => false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sync.is_initialized()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn debounce_window(&self) -> std::time::Duration {
        self.debouncer.window()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> Option<String> {
        self.view.view_mode = mode;
        self.push_url()
    }

    /// 设置排序；目录不提供的排序方式被忽略
    pub fn set_sort(&mut self, sort: SortKey) -> Option<String> {
        if !self.codec.defaults().accepts_sort(sort) {
            tracing::debug!("Ignoring unsupported sort {:?}", sort);
            return None;
        }
        self.view.sort = sort;
        self.push_url()
    }

    /// 切换一个分类取值；目录不支持的字段被忽略
    pub fn toggle_facet(&mut self, facet: Facet, value: &str) -> Option<String> {
        if !self.codec.defaults().accepts(facet) {
            tracing::debug!("Ignoring unsupported facet {:?}", facet);
            return None;
        }
        self.view.filters.toggle(facet, value);
        self.push_url()
    }

    pub fn set_year_range(&mut self, range: Option<YearRange>) -> Option<String> {
        self.view.filters.year_range = range;
        self.normalize();
        self.push_url()
    }

    pub fn set_score_range(&mut self, range: Option<ScoreRange>) -> Option<String> {
        self.view.filters.score_range = range;
        self.normalize();
        self.push_url()
    }

    pub fn remove_filter(&mut self, filter: &ActiveFilter) -> Option<String> {
        if !self.view.filters.remove(filter) {
            return None;
        }
        self.push_url()
    }

    /// 清空所有筛选，保留排序、展示模式与搜索词
    pub fn clear_filters(&mut self) -> Option<String> {
        self.view.filters.clear();
        self.push_url()
    }

    /// 用户在搜索框中输入：URL 立即反映原始输入，筛选等待防抖。
    /// 从 URL 初始化之前的输入被忽略。
    pub fn input_search(&mut self, raw: impl Into<String>) -> Option<String> {
        if !self.is_initialized() {
            tracing::debug!("Ignoring search input before hydration");
            return None;
        }
        self.search_input = raw.into();
        self.debouncer.push(self.search_input.clone());
        self.push_url()
    }

    /// 应用一个已稳定的搜索词
    pub fn settle_search(&mut self, value: String) {
        self.view.search = value;
    }

    /// 等待下一个稳定的搜索词并应用；防抖器已关闭时返回 false
    pub async fn next_settled_search(&mut self) -> bool {
        match self.settled.recv().await {
            Some(value) => {
                self.settle_search(value);
                true
            }
            None => false,
        }
    }

    /// 非阻塞地应用已经稳定的搜索词
    pub fn poll_settled_search(&mut self) -> bool {
        let mut applied = false;
        while let Ok(value) = self.settled.try_recv() {
            self.settle_search(value);
            applied = true;
        }
        applied
    }

    pub fn has_active_filters(&self) -> bool {
        self.view.filters.has_active_filters()
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.view.filters.active_filters()
    }

    /// 当前视图下的记录
    pub fn results(&self) -> Vec<&R> {
        view_engine::apply_view(self.catalog.records(), &self.view)
    }

    pub fn neighbors(&self, id: &str) -> Option<Neighbors> {
        view_engine::neighbors(&self.results(), id)
    }

    /// 页面卸载：取消待定的防抖，避免之后再更新状态
    pub fn teardown(&mut self) {
        self.debouncer.cancel();
    }

    fn normalize(&mut self) {
        let view = std::mem::replace(&mut self.view, self.codec.defaults().initial_view());
        self.view = self.codec.defaults().normalize(view);
    }

    /// URL 中的搜索词取原始输入
    fn push_url(&mut self) -> Option<String> {
        let mut url_view = self.view.clone();
        url_view.search = self.search_input.clone();
        self.sync.push(&self.codec, &url_view)
    }
}
