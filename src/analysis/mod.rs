//! 视频评论分析模块
//!
//! 负责单个视频的核心分析流程，包括：
//! - 评论获取（实时抓取或本地缓存）
//! - 逐条情感分类
//! - 百分比分布聚合
//! - 示例评论的固定种子抽样

use crate::classifier::SentimentAnalyzer;
use crate::models::{Comment, Sentiment, SentimentDistribution, VideoTarget};
use crate::source::CommentCollector;
use crate::storage::CommentCache;
use anyhow::{anyhow, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, warn};

/// 分类进度日志的间隔（条）
const PROGRESS_INTERVAL: usize = 500;

/// 单个视频的分析状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisState {
    NotStarted,
    Loading,
    Classifying,
    Aggregated,
    Failed,
}

/// 单个视频的分析产出
#[derive(Debug, Clone)]
pub struct VideoAnalysis {
    /// 分类完成的评论（保持获取顺序）
    pub comments: Vec<Comment>,
    /// 情感百分比分布
    pub distribution: SentimentDistribution,
}

/// 视频分析流水线
///
/// 依赖全部显式注入（评论收集器、分类器、缓存），
/// 测试中可以整体替换为假实现。
pub struct AnalysisPipeline {
    collector: CommentCollector,
    analyzer: SentimentAnalyzer,
    cache: CommentCache,
    max_comments: usize,
}

impl AnalysisPipeline {
    pub fn new(
        collector: CommentCollector,
        analyzer: SentimentAnalyzer,
        cache: CommentCache,
        max_comments: usize,
    ) -> Self {
        Self {
            collector,
            analyzer,
            cache,
            max_comments,
        }
    }

    /// 分析单个视频
    ///
    /// # 参数
    /// * `target` - 待分析的视频
    /// * `use_live_source` - true时实时抓取并覆盖缓存，false时只读缓存
    ///
    /// 失败（缓存缺失/不可读、评论集为空）通过Err返回，
    /// 由上层隔离处理，不影响其他视频。
    pub async fn analyze(
        &self,
        target: &VideoTarget,
        use_live_source: bool,
    ) -> Result<VideoAnalysis> {
        let mut state = AnalysisState::NotStarted;

        // 加载阶段
        transition(&mut state, AnalysisState::Loading, &target.title);
        let mut comments = if use_live_source {
            info!("--- 开始分析: {} (实时抓取模式) ---", target.title);
            let comments = self.collector.collect(&target.id, self.max_comments).await;

            if !comments.is_empty() {
                // 抓取结果立刻落盘，下次可用本地模式重放
                if let Err(e) = self.cache.save(target, &comments) {
                    warn!("无法保存评论缓存: {}", e);
                }
            }
            comments
        } else {
            info!("--- 开始分析: {} (本地缓存模式) ---", target.title);
            match self.cache.load(target) {
                Ok(comments) => comments,
                Err(e) => {
                    transition(&mut state, AnalysisState::Failed, &target.title);
                    return Err(e);
                }
            }
        };

        if comments.is_empty() {
            transition(&mut state, AnalysisState::Failed, &target.title);
            return Err(anyhow!("视频 {} 没有可分析的评论", target.title));
        }

        // 分类阶段：按获取顺序逐条处理
        transition(&mut state, AnalysisState::Classifying, &target.title);
        let total = comments.len();
        info!(
            "开始情感分类（提供商: {}），共 {} 条评论...",
            self.analyzer.provider_name(),
            total
        );

        for (i, comment) in comments.iter_mut().enumerate() {
            let sentiment = self
                .analyzer
                .classify_or_neutral(&comment.normalized_text)
                .await;
            comment.sentiment = Some(sentiment);

            // 仅用于观测进度，对结果无影响
            if (i + 1) % PROGRESS_INTERVAL == 0 {
                info!("  已处理 {}/{} 条评论...", i + 1, total);
            }
        }

        // 聚合阶段
        transition(&mut state, AnalysisState::Aggregated, &target.title);
        let distribution = aggregate(&comments)
            .ok_or_else(|| anyhow!("视频 {} 的评论集为空，无法聚合", target.title))?;

        info!("分析完成: {}", target.title);
        Ok(VideoAnalysis {
            comments,
            distribution,
        })
    }
}

fn transition(state: &mut AnalysisState, next: AnalysisState, title: &str) {
    debug!("分析状态 [{}]: {:?} -> {:?}", title, state, next);
    *state = next;
}

/// 将分类完成的评论集聚合为百分比分布
///
/// 空集合返回None（不定义分布，调用方按失败处理），
/// 非空集合三项之和为100（浮点误差内）。
pub fn aggregate(comments: &[Comment]) -> Option<SentimentDistribution> {
    if comments.is_empty() {
        return None;
    }

    let total = comments.len() as f64;
    let mut positive = 0usize;
    let mut neutral = 0usize;
    let mut negative = 0usize;

    for comment in comments {
        match comment.sentiment {
            Some(Sentiment::Positive) => positive += 1,
            Some(Sentiment::Negative) => negative += 1,
            // 未分类的评论按中性计（与失败回退策略一致）
            Some(Sentiment::Neutral) | None => neutral += 1,
        }
    }

    Some(SentimentDistribution {
        positive_pct: positive as f64 / total * 100.0,
        neutral_pct: neutral as f64 / total * 100.0,
        negative_pct: negative as f64 / total * 100.0,
    })
}

/// 按固定种子抽取某个标签的示例评论
///
/// 对同样的输入顺序和种子，返回的下标集合完全一致；
/// 结果按原始获取顺序排列，最多 `n` 条。
pub fn sample_examples(
    comments: &[Comment],
    label: Sentiment,
    n: usize,
    seed: u64,
) -> Vec<Comment> {
    let indices: Vec<usize> = comments
        .iter()
        .enumerate()
        .filter(|(_, c)| c.sentiment == Some(label))
        .map(|(i, _)| i)
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut chosen: Vec<usize> = indices.choose_multiple(&mut rng, n).copied().collect();
    chosen.sort_unstable();

    chosen.into_iter().map(|i| comments[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SentimentProvider;
    use crate::source::{CommentFeed, CommentPage, RawComment};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// 单页假评论流
    struct FakeFeed {
        texts: Vec<&'static str>,
    }

    #[async_trait]
    impl CommentFeed for FakeFeed {
        async fn fetch_page(
            &self,
            _video_id: &str,
            _page_size: u32,
            _page_token: Option<&str>,
        ) -> Result<CommentPage> {
            Ok(CommentPage {
                items: self
                    .texts
                    .iter()
                    .map(|t| RawComment {
                        author: "user".to_string(),
                        text: t.to_string(),
                    })
                    .collect(),
                next_page_token: None,
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    /// 按关键词给标签的假提供商
    struct KeywordProvider;

    #[async_trait]
    impl SentimentProvider for KeywordProvider {
        async fn predict(&self, text: &str) -> Result<String> {
            if text.contains("encanta") {
                Ok("POS".to_string())
            } else if text.contains("odio") {
                Ok("NEG".to_string())
            } else if text.contains("falla") {
                Err(anyhow!("model unavailable"))
            } else {
                Ok("NEU".to_string())
            }
        }

        fn name(&self) -> &str {
            "keyword"
        }

        fn configure(&mut self, _config: serde_json::Value) -> Result<()> {
            Ok(())
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    fn pipeline(texts: Vec<&'static str>, dir: &std::path::Path) -> AnalysisPipeline {
        AnalysisPipeline::new(
            CommentCollector::new(Arc::new(FakeFeed { texts })),
            SentimentAnalyzer::new(Box::new(KeywordProvider)),
            CommentCache::new(dir.to_path_buf()),
            100,
        )
    }

    fn target() -> VideoTarget {
        VideoTarget {
            id: "vid".to_string(),
            title: "Video de prueba".to_string(),
            cache_file: None,
        }
    }

    fn classified(label: Sentiment, n: usize) -> Vec<Comment> {
        (0..n)
            .map(|i| {
                let mut c = Comment::new(
                    format!("u{}", i),
                    format!("texto {}", i),
                    format!("texto {}", i),
                );
                c.sentiment = Some(label);
                c
            })
            .collect()
    }

    #[tokio::test]
    async fn test_live_analysis_classifies_and_aggregates() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(
            vec!["me encanta", "me encanta mucho", "lo odio", "normal"],
            dir.path(),
        );

        let analysis = pipeline.analyze(&target(), true).await.unwrap();
        assert_eq!(analysis.comments.len(), 4);

        let d = analysis.distribution;
        assert!((d.positive_pct - 50.0).abs() < 1e-6);
        assert!((d.negative_pct - 25.0).abs() < 1e-6);
        assert!((d.neutral_pct - 25.0).abs() < 1e-6);

        // 实时抓取后缓存应当已落盘
        assert!(dir.path().join("comentarios_video_vid.csv").exists());
    }

    #[tokio::test]
    async fn test_classifier_failure_counts_as_neutral() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(vec!["esto falla", "me encanta"], dir.path());

        let analysis = pipeline.analyze(&target(), true).await.unwrap();
        let d = analysis.distribution;
        assert!((d.neutral_pct - 50.0).abs() < 1e-6);
        assert!((d.positive_pct - 50.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_missing_cache_fails_in_local_mode() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(vec!["me encanta"], dir.path());

        // 本地模式下没有缓存文件：该视频分析失败
        assert!(pipeline.analyze(&target(), false).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_comment_set_fails_without_crash() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(vec![], dir.path());

        assert!(pipeline.analyze(&target(), true).await.is_err());
    }

    #[tokio::test]
    async fn test_processing_preserves_collection_order() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline(vec!["uno", "dos", "tres"], dir.path());

        let analysis = pipeline.analyze(&target(), true).await.unwrap();
        let texts: Vec<&str> = analysis
            .comments
            .iter()
            .map(|c| c.raw_text.as_str())
            .collect();
        assert_eq!(texts, vec!["uno", "dos", "tres"]);
    }

    #[test]
    fn test_aggregate_sums_to_100_for_non_empty() {
        let mut comments = classified(Sentiment::Positive, 7);
        comments.extend(classified(Sentiment::Neutral, 2));
        comments.extend(classified(Sentiment::Negative, 1));

        let d = aggregate(&comments).unwrap();
        let sum = d.positive_pct + d.neutral_pct + d.negative_pct;
        assert!((sum - 100.0).abs() < 1e-6);
        assert!((d.positive_pct - 70.0).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_empty_is_undefined() {
        assert!(aggregate(&[]).is_none());
    }

    #[test]
    fn test_sample_examples_is_deterministic() {
        let comments = classified(Sentiment::Positive, 50);

        let a = sample_examples(&comments, Sentiment::Positive, 10, 42);
        let b = sample_examples(&comments, Sentiment::Positive, 10, 42);
        assert_eq!(a.len(), 10);
        assert_eq!(
            a.iter().map(|c| &c.author).collect::<Vec<_>>(),
            b.iter().map(|c| &c.author).collect::<Vec<_>>()
        );

        // 不同种子给出不同选择（50选10在两个种子下撞满的概率可忽略）
        let c = sample_examples(&comments, Sentiment::Positive, 10, 7);
        assert_ne!(
            a.iter().map(|x| &x.author).collect::<Vec<_>>(),
            c.iter().map(|x| &x.author).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sample_examples_filters_by_label() {
        let mut comments = classified(Sentiment::Positive, 3);
        comments.extend(classified(Sentiment::Negative, 3));

        let sampled = sample_examples(&comments, Sentiment::Negative, 10, 42);
        assert_eq!(sampled.len(), 3);
        assert!(sampled
            .iter()
            .all(|c| c.sentiment == Some(Sentiment::Negative)));
    }
}
