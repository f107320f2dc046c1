// 远程推理提供商实现 - 调用预训练西语情感模型的HTTP接口

use super::plugin::SentimentProvider;
use crate::models::ClassifierConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// 远程情感模型提供商（接受共享的HTTP客户端以复用连接池）
pub struct RemoteProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    /// 评论语言（随请求传给模型服务）
    language: String,
    client: Client,
}

impl RemoteProvider {
    /// 按配置构造提供商
    pub fn from_config(client: Client, config: &ClassifierConfig, language: &str) -> Self {
        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            language: language.to_string(),
            client,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }
}

#[async_trait]
impl SentimentProvider for RemoteProvider {
    async fn predict(&self, text: &str) -> Result<String> {
        let mut request = self.client.post(self.endpoint()).json(&json!({
            "inputs": text,
            "parameters": { "lang": self.language },
        }));

        if let Some(api_key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("推理接口返回错误 {}: {}", status, error_text));
        }

        let body: serde_json::Value = response.json().await?;
        top_label(&body)
    }

    fn name(&self) -> &str {
        "remote"
    }

    fn configure(&mut self, config: serde_json::Value) -> Result<()> {
        if let Some(api_key) = config.get("api_key").and_then(|v| v.as_str()) {
            self.api_key = Some(api_key.to_string());
        }
        if let Some(model) = config.get("model").and_then(|v| v.as_str()) {
            self.model = model.to_string();
        }
        if let Some(base_url) = config.get("base_url").and_then(|v| v.as_str()) {
            self.base_url = base_url.to_string();
        }
        if let Some(language) = config.get("language").and_then(|v| v.as_str()) {
            self.language = language.to_string();
        }
        Ok(())
    }

    fn is_configured(&self) -> bool {
        // 公共推理端点允许匿名调用，api_key可选
        !self.model.is_empty() && !self.base_url.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// 从推理应答中取得分最高的标签
///
/// 文本分类接口的应答形如 `[[{"label": "POS", "score": 0.98}, ...]]`，
/// 部分部署会省略外层数组。
fn top_label(body: &serde_json::Value) -> Result<String> {
    let scores: Vec<LabelScore> =
        if let Ok(nested) = serde_json::from_value::<Vec<Vec<LabelScore>>>(body.clone()) {
            nested.into_iter().next().unwrap_or_default()
        } else {
            serde_json::from_value(body.clone())
                .map_err(|e| anyhow!("无法解析推理应答: {} ({})", e, body))?
        };

    scores
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|entry| entry.label)
        .ok_or_else(|| anyhow!("推理应答不含任何标签"))
}
