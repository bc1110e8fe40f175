// 浏览服务错误类型定义
//
// 只覆盖启动阶段（配置、目录加载）的错误；查询参数错误一律静默回退默认值，不会出现在这里。

use std::path::PathBuf;
use thiserror::Error;

use crate::models::ValidationError;

/// 浏览服务的统一错误类型
#[derive(Debug, Error)]
pub enum BrowseError {
    #[error("读取目录文件失败 {path:?}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("目录文件格式错误 {path:?}: {source}")]
    CatalogFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("记录校验失败 ({id}): {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: ValidationError,
    },

    #[error("重复的记录 ID: {0}")]
    DuplicateId(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("JSON 序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}
