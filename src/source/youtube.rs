// YouTube评论流实现 - 调用Data API v3的commentThreads接口

use super::{CommentFeed, CommentPage, RawComment};
use crate::models::YouTubeConfig;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// YouTube评论流（接受共享的HTTP客户端以复用连接池）
pub struct YouTubeFeed {
    api_key: String,
    base_url: String,
    client: Client,
}

impl YouTubeFeed {
    pub fn new(client: Client, config: &YouTubeConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[async_trait]
impl CommentFeed for YouTubeFeed {
    async fn fetch_page(
        &self,
        video_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<CommentPage> {
        if !self.is_configured() {
            return Err(anyhow!("YouTube API key未配置"));
        }

        let url = format!("{}/commentThreads", self.base_url);
        let page_size = page_size.to_string();

        let mut query: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", &page_size),
            ("key", &self.api_key),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self.client.get(&url).query(&query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("YouTube接口返回错误 {}: {}", status, error_text));
        }

        let body: CommentThreadListResponse = response.json().await?;

        let items = body
            .items
            .into_iter()
            .filter_map(|thread| thread.snippet)
            .map(|snippet| {
                let comment = snippet.top_level_comment.snippet;
                RawComment {
                    author: comment.author_display_name,
                    text: comment.text_display,
                }
            })
            .collect();

        Ok(CommentPage {
            items,
            next_page_token: body.next_page_token,
        })
    }

    fn name(&self) -> &str {
        "youtube"
    }
}

// ==================== 接口应答结构 ====================

#[derive(Debug, Deserialize)]
struct CommentThreadListResponse {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<CommentThread>,
}

#[derive(Debug, Deserialize)]
struct CommentThread {
    snippet: Option<ThreadSnippet>,
}

#[derive(Debug, Deserialize)]
struct ThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: TopLevelComment,
}

#[derive(Debug, Deserialize)]
struct TopLevelComment {
    snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
struct CommentSnippet {
    #[serde(rename = "authorDisplayName")]
    author_display_name: String,
    #[serde(rename = "textDisplay")]
    text_display: String,
}
