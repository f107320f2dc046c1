// 数据模型模块 - 定义所有的数据结构

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 情感标签（分类结果的封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "POSITIVO")]
    Positive,
    #[serde(rename = "NEUTRO")]
    Neutral,
    #[serde(rename = "NEGATIVO")]
    Negative,
}

impl Sentiment {
    /// 报告中的固定显示顺序：正面、中性、负面
    pub const DISPLAY_ORDER: [Sentiment; 3] =
        [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// 获取标签的西语显示名称（报告面向西语观众）
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Positive => "Positivo",
            Self::Neutral => "Neutro",
            Self::Negative => "Negativo",
        }
    }

    /// 获取标签的颜色（用于图表显示）
    pub fn color(&self) -> &'static str {
        match self {
            Self::Positive => "#4CAF50", // 绿色
            Self::Neutral => "#FFC107",  // 黄色
            Self::Negative => "#F44336", // 红色
        }
    }
}

/// 单条评论
///
/// `normalized_text` 总是由 `raw_text` 经过全局统一的清洗函数推导，
/// 缓存中的旧值不会被信任。情感标签只在分类阶段赋值一次。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// 评论作者显示名称
    pub author: String,
    /// 原始评论文本
    pub raw_text: String,
    /// 清洗后的文本（分类输入）
    pub normalized_text: String,
    /// 情感标签（分类前为None）
    pub sentiment: Option<Sentiment>,
}

impl Comment {
    pub fn new(author: String, raw_text: String, normalized_text: String) -> Self {
        Self {
            author,
            raw_text,
            normalized_text,
            sentiment: None,
        }
    }
}

/// 待分析的视频（静态配置，运行期不修改）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoTarget {
    /// YouTube视频ID
    pub id: String,
    /// 展示标题（图表图例）
    pub title: String,
    /// 缓存文件名（省略时按视频ID生成）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<String>,
}

impl VideoTarget {
    /// 该视频的评论缓存文件路径
    pub fn cache_path(&self, cache_dir: &Path) -> PathBuf {
        match &self.cache_file {
            Some(name) => cache_dir.join(name),
            None => cache_dir.join(format!("comentarios_video_{}.csv", self.id)),
        }
    }
}

/// 情感百分比分布（非空评论集上三项之和为100）
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive_pct: f64,
    pub neutral_pct: f64,
    pub negative_pct: f64,
}

impl SentimentDistribution {
    /// 按标签取百分比
    pub fn pct(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive_pct,
            Sentiment::Neutral => self.neutral_pct,
            Sentiment::Negative => self.negative_pct,
        }
    }
}

/// 单个视频的分析结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoReport {
    /// 视频展示标题
    pub title: String,
    /// 情感百分比分布
    pub distribution: SentimentDistribution,
    /// 参与统计的评论总数
    pub total_comments: usize,
    /// 正面示例评论（固定种子抽样）
    pub positive_examples: Vec<Comment>,
    /// 负面示例评论（固定种子抽样）
    pub negative_examples: Vec<Comment>,
}

/// 跨视频对比报告（按目标顺序，只包含分析成功的视频）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub videos: Vec<VideoReport>,
}

// ==================== 配置 ====================

/// YouTube数据接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API密钥
    #[serde(default)]
    pub api_key: String,
    /// 接口基础地址
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,
}

fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_youtube_base_url(),
        }
    }
}

/// 情感分类服务配置（外部预训练模型的HTTP推理接口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// 推理接口密钥（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// 模型名称
    #[serde(default = "default_classifier_model")]
    pub model: String,
    /// 接口基础地址
    #[serde(default = "default_classifier_base_url")]
    pub base_url: String,
}

fn default_classifier_model() -> String {
    "pysentimiento/robertuito-sentiment-analysis".to_string()
}

fn default_classifier_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_classifier_model(),
            base_url: default_classifier_base_url(),
        }
    }
}

/// 持久化的应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedConfig {
    /// 是否实时抓取（false时仅读取本地缓存）
    #[serde(default)]
    pub use_live_source: bool,
    /// 每个视频的评论抓取上限
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
    /// 评论语言（传给分类服务）
    #[serde(default = "default_language")]
    pub language: String,
    /// 评论缓存目录
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// 对比图输出路径
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
    /// YouTube接口配置
    #[serde(default)]
    pub youtube: YouTubeConfig,
    /// 分类服务配置
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// 待对比的视频列表
    #[serde(default)]
    pub videos: Vec<VideoTarget>,
}

fn default_max_comments() -> usize {
    15000
}

fn default_language() -> String {
    "es".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_chart_path() -> PathBuf {
    PathBuf::from("comparacion_sentimiento_final.png")
}

impl Default for PersistedConfig {
    fn default() -> Self {
        Self {
            use_live_source: false,
            max_comments: default_max_comments(),
            language: default_language(),
            cache_dir: default_cache_dir(),
            chart_path: default_chart_path(),
            youtube: YouTubeConfig::default(),
            classifier: ClassifierConfig::default(),
            videos: Vec::new(),
        }
    }
}

/// 单次运行的配置覆盖（来自命令行）
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// 覆盖是否实时抓取
    pub use_live_source: Option<bool>,
    /// 覆盖评论抓取上限
    pub max_comments: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_serde_uses_cache_vocabulary() {
        // 缓存文件中的标签必须是西语大写形式
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"POSITIVO\"");

        let parsed: Sentiment = serde_json::from_str("\"NEUTRO\"").unwrap();
        assert_eq!(parsed, Sentiment::Neutral);
    }

    #[test]
    fn test_default_cache_path_from_video_id() {
        let target = VideoTarget {
            id: "oI1eamjjTAo".to_string(),
            title: "Comedia".to_string(),
            cache_file: None,
        };
        let path = target.cache_path(Path::new("data"));
        assert_eq!(
            path,
            Path::new("data").join("comentarios_video_oI1eamjjTAo.csv")
        );
    }

    #[test]
    fn test_persisted_config_fills_defaults() {
        // 空JSON也能得到可用配置
        let config: PersistedConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.use_live_source);
        assert_eq!(config.max_comments, 15000);
        assert_eq!(config.language, "es");
        assert!(config.videos.is_empty());
    }
}
