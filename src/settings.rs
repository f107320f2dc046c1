// 设置管理 - JSON配置文件的加载、默认值与运行时覆盖

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::{PersistedConfig, RunOverrides};

pub struct SettingsManager {
    data: RwLock<PersistedConfig>,
}

impl SettingsManager {
    /// 打开配置文件；不存在或为空时写入默认配置
    pub async fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let initial = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => match serde_json::from_slice::<PersistedConfig>(
                &bytes,
            ) {
                Ok(config) => config,
                Err(e) => {
                    warn!("配置文件解析失败，使用默认配置: {}", e);
                    PersistedConfig::default()
                }
            },
            _ => {
                let default = PersistedConfig::default();
                let json = serde_json::to_string_pretty(&default)?;
                tokio::fs::write(&path, json).await?;
                default
            }
        };

        Ok(Self {
            data: RwLock::new(initial),
        })
    }

    pub async fn get(&self) -> PersistedConfig {
        self.data.read().await.clone()
    }

    /// 应用命令行覆盖项（不落盘，仅当次运行生效）
    pub async fn apply_overrides(&self, overrides: RunOverrides) -> PersistedConfig {
        let mut config = self.data.write().await;

        if let Some(live) = overrides.use_live_source {
            config.use_live_source = live;
        }
        if let Some(max) = overrides.max_comments {
            config.max_comments = max;
        }

        config.clone()
    }
}
