use crate::models::ViewState;

use super::query_codec::QueryCodec;

/// URL 同步
///
/// 页面首次从 URL 读取状态之前不允许写 URL，避免用默认值覆盖深链接；
/// URL 没有变化时也不重复写入。
#[derive(Debug, Clone)]
pub struct UrlSync {
    path: String,
    initialized: bool,
    current_url: Option<String>,
}

impl UrlSync {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            initialized: false,
            current_url: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// 首次读取 URL。只生效一次，之后的调用返回 `None`。
    pub fn hydrate(&mut self, codec: &QueryCodec, query: &str) -> Option<ViewState> {
        if self.initialized {
            return None;
        }

        let query = query.strip_prefix('?').unwrap_or(query);
        let view = codec.deserialize(query);
        self.current_url = Some(build_url(&self.path, query));
        self.initialized = true;

        tracing::debug!("Hydrated view for {} from {:?}", self.path, query);
        Some(view)
    }

    /// 计算需要推送的 URL；未初始化或 URL 未变化时返回 `None`
    pub fn push(&mut self, codec: &QueryCodec, view: &ViewState) -> Option<String> {
        if !self.initialized {
            tracing::debug!("Skipping URL write for {} before hydration", self.path);
            return None;
        }

        let url = build_url(&self.path, &codec.serialize(view));
        if self.current_url.as_deref() == Some(url.as_str()) {
            return None;
        }

        self.current_url = Some(url.clone());
        Some(url)
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }
}

/// 拼接路径与查询串，查询串为空时不带 `?`
pub fn build_url(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}
