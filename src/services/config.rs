// 浏览服务配置数据结构
//
// 存储在 browse_config.json，缺失的字段使用默认值。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 浏览服务配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowseConfig {
    /// 搜索输入防抖窗口（毫秒）
    #[serde(default = "default_debounce_window_ms")]
    pub debounce_window_ms: u64,

    /// 电影目录文件
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,

    /// 视觉盛宴目录文件
    #[serde(default = "default_visual_treats_path")]
    pub visual_treats_path: PathBuf,

    /// 视图缓存
    #[serde(default)]
    pub view_cache: ViewCacheConfig,
}

/// 视图缓存配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewCacheConfig {
    /// 最多缓存的视图数
    pub capacity: u64,

    /// 过期时间（秒）
    pub ttl_secs: u64,
}

fn default_debounce_window_ms() -> u64 {
    300
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("data/movies.json")
}

fn default_visual_treats_path() -> PathBuf {
    PathBuf::from("data/visual_treats.json")
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            debounce_window_ms: default_debounce_window_ms(),
            movies_path: default_movies_path(),
            visual_treats_path: default_visual_treats_path(),
            view_cache: ViewCacheConfig::default(),
        }
    }
}

impl Default for ViewCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000,
            ttl_secs: 10 * 60,
        }
    }
}

impl BrowseConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowseConfig::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
        assert_eq!(config.movies_path, PathBuf::from("data/movies.json"));
        assert_eq!(config.view_cache.capacity, 1_000);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: BrowseConfig = serde_json::from_str(r#"{ "debounce_window_ms": 150 }"#).unwrap();
        assert_eq!(config.debounce_window_ms, 150);
        assert_eq!(config.visual_treats_path, PathBuf::from("data/visual_treats.json"));
        assert_eq!(config.view_cache, ViewCacheConfig::default());
    }
}
