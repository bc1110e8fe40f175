use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use super::config::ViewCacheConfig;

/// 推导视图的缓存
///
/// 以 "目录名:规范查询串" 为键缓存结果下标。目录是只读快照，
/// 同一规范查询串总是得到同一结果，因此缓存只需要容量与过期淘汰。
#[derive(Clone)]
pub struct ViewCache {
    inner: Cache<String, Arc<Vec<usize>>>,
}

impl ViewCache {
    pub fn new(config: &ViewCacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(Duration::from_secs(config.ttl_secs))
            .build();
        Self { inner }
    }

    fn key(catalog: &str, canonical_query: &str) -> String {
        format!("{}:{}", catalog, canonical_query)
    }

    /// 取缓存结果，未命中时调用 `compute` 计算并写入
    pub async fn get_or_compute<F>(
        &self,
        catalog: &str,
        canonical_query: &str,
        compute: F,
    ) -> Arc<Vec<usize>>
    where
        F: FnOnce() -> Vec<usize>,
    {
        let key = Self::key(catalog, canonical_query);
        self.inner
            .get_with(key, async move {
                tracing::debug!("View cache miss: {}:{}", catalog, canonical_query);
                Arc::new(compute())
            })
            .await
    }

    pub async fn contains(&self, catalog: &str, canonical_query: &str) -> bool {
        self.inner
            .get(&Self::key(catalog, canonical_query))
            .await
            .is_some()
    }

    /// 缓存条目数（先处理积压的维护任务）
    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl std::fmt::Debug for ViewCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewCache")
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}
