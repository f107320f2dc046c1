// YouTube评论情感对比分析 - 主库

// 声明模块
pub mod analysis;
pub mod classifier;
pub mod logger;
pub mod models;
pub mod normalizer;
pub mod report;
pub mod settings;
pub mod source;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use analysis::AnalysisPipeline;
use classifier::plugin::SentimentProvider;
use classifier::remote::RemoteProvider;
use classifier::SentimentAnalyzer;
use models::{PersistedConfig, RunOverrides};
use report::ComparativeReporter;
use settings::SettingsManager;
use source::youtube::YouTubeFeed;
use source::CommentCollector;
use storage::CommentCache;

/// 按配置组装流水线并运行完整的对比分析
///
/// 返回控制台摘要文本；对比图（若生成）写到配置的路径。
pub async fn run(config_path: PathBuf, overrides: RunOverrides) -> Result<String> {
    let settings = SettingsManager::new(config_path).await?;
    let config = settings.apply_overrides(overrides).await;

    if config.videos.is_empty() {
        return Err(anyhow!("配置中没有任何视频，无法进行分析"));
    }

    let reporter = build_reporter(&config)?;

    info!(
        "开始分析 {} 个视频 (数据来源: {})",
        config.videos.len(),
        if config.use_live_source {
            "YouTube接口"
        } else {
            "本地缓存"
        }
    );

    let report = reporter
        .compare(&config.videos, config.use_live_source)
        .await;
    if report.videos.is_empty() {
        return Err(anyhow!("所有视频分析均失败"));
    }

    reporter.render_chart(&report)?;
    Ok(report::render_text(&report))
}

/// 根据配置组装各组件
fn build_reporter(config: &PersistedConfig) -> Result<ComparativeReporter> {
    // 共享的HTTP客户端，评论拉取和情感分类复用同一个连接池
    let client = reqwest::Client::new();

    let feed = YouTubeFeed::new(client.clone(), &config.youtube);
    if config.use_live_source && !feed.is_configured() {
        warn!("YouTube API密钥未配置，在线拉取会失败");
    }

    let provider = RemoteProvider::from_config(client, &config.classifier, &config.language);
    if !provider.is_configured() {
        info!("情感分类未配置API密钥，将匿名调用");
    }

    let collector = CommentCollector::new(Arc::new(feed));
    let analyzer = SentimentAnalyzer::new(Box::new(provider));
    let cache = CommentCache::new(PathBuf::from(&config.cache_dir));

    let pipeline = AnalysisPipeline::new(collector, analyzer, cache, config.max_comments);
    Ok(ComparativeReporter::new(
        pipeline,
        PathBuf::from(&config.chart_path),
    ))
}
