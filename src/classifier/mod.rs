// 分类器模块 - 管理情感分析服务

pub mod plugin;
pub mod remote;

pub use plugin::{map_raw_label, ClassifyOutcome, SentimentProvider};
pub use remote::RemoteProvider;

use crate::models::Sentiment;
use tracing::debug;

/// 情感分析器
///
/// 持有注入的提供商实例（测试中可替换为假实现），
/// 负责把模型原始标签收敛到封闭标签集。
pub struct SentimentAnalyzer {
    provider: Box<dyn SentimentProvider>,
}

impl SentimentAnalyzer {
    pub fn new(provider: Box<dyn SentimentProvider>) -> Self {
        Self { provider }
    }

    /// 分类一段清洗后的文本，保留失败信息
    pub async fn classify(&self, text: &str) -> ClassifyOutcome {
        match self.provider.predict(text).await {
            Ok(raw) => match map_raw_label(&raw) {
                Some(sentiment) => ClassifyOutcome::Classified(sentiment),
                None => ClassifyOutcome::Failed(format!("无法识别的标签: {}", raw)),
            },
            Err(e) => ClassifyOutcome::Failed(e.to_string()),
        }
    }

    /// 分类并在失败时回退为中性（流水线使用的默认策略）
    pub async fn classify_or_neutral(&self, text: &str) -> Sentiment {
        let outcome = self.classify(text).await;
        if let ClassifyOutcome::Failed(reason) = &outcome {
            debug!("分类失败，回退为中性: {}", reason);
        }
        outcome.or_neutral()
    }

    /// 当前提供商名称
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}
