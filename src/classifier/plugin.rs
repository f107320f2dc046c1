// 分类器插件系统 - 定义情感提供商接口和结果类型

use crate::models::Sentiment;
use anyhow::Result;
use async_trait::async_trait;

/// 情感分类提供商接口（外部预训练模型的黑盒封装）
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// 对一段清洗后的文本做预测，返回模型的原始标签（如 POS/NEG/NEU）
    async fn predict(&self, text: &str) -> Result<String>;

    /// 获取提供商名称
    fn name(&self) -> &str;

    /// 配置提供商
    ///
    /// # 参数
    /// * `config` - JSON格式的配置
    fn configure(&mut self, config: serde_json::Value) -> Result<()>;

    /// 检查提供商是否已配置
    fn is_configured(&self) -> bool;
}

/// 单次分类的显式结果
///
/// 区分“模型判定”与“调用失败”，由调用方决定是否回退为中性，
/// 而不是在这里吞掉错误。
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyOutcome {
    /// 模型给出了可识别的标签
    Classified(Sentiment),
    /// 调用失败或标签无法识别
    Failed(String),
}

impl ClassifyOutcome {
    /// 失败时回退为中性（与原始行为一致的默认策略）
    pub fn or_neutral(self) -> Sentiment {
        match self {
            Self::Classified(sentiment) => sentiment,
            Self::Failed(_) => Sentiment::Neutral,
        }
    }
}

/// 将模型原始标签映射到封闭标签集
///
/// 可识别集合：POS、NEG、NEU（大小写不敏感）。其余标签返回None，
/// 由上层决定按失败处理还是回退为中性。
pub fn map_raw_label(raw: &str) -> Option<Sentiment> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "POS" => Some(Sentiment::Positive),
        "NEG" => Some(Sentiment::Negative),
        "NEU" => Some(Sentiment::Neutral),
        _ => None,
    }
}
