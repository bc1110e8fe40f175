// 内容目录 - 只读的记录快照
//
// 记录来源抽象为 RecordSource，目前只有 JSON 文件与内存两种实现。
// 加载后逐条校验并检查 ID 唯一，之后不再修改。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::models::{ContentRecord, Validator};

use super::error::BrowseError;

/// 记录来源
#[async_trait]
pub trait RecordSource<R>: Send + Sync {
    async fn load(&self) -> Result<Vec<R>, BrowseError>;

    /// 用于日志的来源描述
    fn describe(&self) -> String;
}

/// 从 JSON 数组文件加载记录
#[derive(Debug, Clone)]
pub struct JsonFileSource<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileSource<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<R> RecordSource<R> for JsonFileSource<R>
where
    R: DeserializeOwned + Send + 'static,
{
    async fn load(&self) -> Result<Vec<R>, BrowseError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| BrowseError::CatalogRead {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| BrowseError::CatalogFormat {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }
}

/// 内存中的记录，测试与内置数据使用
#[derive(Debug, Clone)]
pub struct StaticSource<R> {
    records: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl<R: Clone + Send + Sync> RecordSource<R> for StaticSource<R> {
    async fn load(&self) -> Result<Vec<R>, BrowseError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static:{} records", self.records.len())
    }
}

/// 校验过的只读目录
#[derive(Debug, Clone)]
pub struct Catalog<R> {
    records: Vec<R>,
    index: HashMap<String, usize>,
}

impl<R: ContentRecord> Catalog<R> {
    /// 校验每条记录并建立 ID 索引
    pub fn new(records: Vec<R>) -> Result<Self, BrowseError> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            record
                .validate()
                .map_err(|source| BrowseError::InvalidRecord {
                    id: record.id().to_string(),
                    source,
                })?;

            if index.insert(record.id().to_string(), position).is_some() {
                return Err(BrowseError::DuplicateId(record.id().to_string()));
            }
        }

        Ok(Self { records, index })
    }

    pub async fn load(source: &dyn RecordSource<R>) -> Result<Self, BrowseError> {
        let records = source.load().await?;
        let catalog = Self::new(records)?;
        tracing::info!(
            "Loaded {} records from {}",
            catalog.len(),
            source.describe()
        );
        Ok(catalog)
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
