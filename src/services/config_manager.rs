// 配置管理器 - 浏览服务配置的读写
//
// - 从 JSON 文件加载配置
// - 文件不存在时使用默认配置并写回
// - 文件损坏时备份旧文件并使用默认配置

use std::path::{Path, PathBuf};
use tokio::fs;

use super::config::BrowseConfig;
use super::error::BrowseError;

/// 配置管理器
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// 配置文件路径
    config_path: PathBuf,

    config: BrowseConfig,
}

impl ConfigManager {
    /// 默认配置文件路径
    pub const DEFAULT_CONFIG_PATH: &'static str = "browse_config.json";

    /// 从配置文件加载配置
    ///
    /// # 参数
    /// - `config_path`: 可选的配置文件路径，如果为 None 则使用默认路径
    ///
    /// # 行为
    /// - 如果配置文件不存在，使用默认配置并创建文件
    /// - 如果配置文件损坏，使用默认配置并备份旧文件
    pub async fn load(config_path: Option<PathBuf>) -> Result<Self, BrowseError> {
        let config_path =
            config_path.unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_PATH));

        let config = if config_path.exists() {
            match fs::read_to_string(&config_path).await {
                Ok(content) => match serde_json::from_str::<BrowseConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("成功加载浏览配置: {:?}", config_path);
                        config
                    }
                    Err(e) => {
                        tracing::warn!("配置文件损坏，使用默认配置: {}", e);
                        Self::backup_corrupted_config(&config_path).await;
                        BrowseConfig::default()
                    }
                },
                Err(e) => {
                    tracing::warn!("读取配置文件失败，使用默认配置: {}", e);
                    BrowseConfig::default()
                }
            }
        } else {
            tracing::info!("配置文件不存在，使用默认配置");
            BrowseConfig::default()
        };

        let manager = Self {
            config_path,
            config,
        };

        // 保存默认配置到文件
        if !manager.config_path.exists() {
            manager.save().await?;
        }

        Ok(manager)
    }

    /// 保存配置到文件
    pub async fn save(&self) -> Result<(), BrowseError> {
        let json = serde_json::to_string_pretty(&self.config)?;

        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BrowseError::Config(format!("创建配置目录失败: {}", e)))?;
            }
        }

        fs::write(&self.config_path, json)
            .await
            .map_err(|e| BrowseError::Config(format!("写入配置文件失败: {}", e)))?;

        tracing::info!("成功保存浏览配置: {:?}", self.config_path);
        Ok(())
    }

    pub fn config(&self) -> &BrowseConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// 备份损坏的配置文件，失败不影响主流程
    async fn backup_corrupted_config(config_path: &Path) {
        let backup_path = config_path.with_extension("json.backup");

        match fs::rename(config_path, &backup_path).await {
            Ok(_) => tracing::info!("已备份损坏的配置文件到: {:?}", backup_path),
            Err(e) => tracing::warn!("备份配置文件失败: {}", e),
        }
    }
}
