// 评论来源模块 - 抽象分页评论流并实现抓取循环

pub mod youtube;

pub use youtube::YouTubeFeed;

use crate::models::Comment;
use crate::normalizer;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// 单次分页请求的页大小上限（YouTube接口限制）
pub const MAX_PAGE_SIZE: u32 = 100;

/// 外部评论流返回的原始记录
#[derive(Debug, Clone)]
pub struct RawComment {
    /// 作者显示名称
    pub author: String,
    /// 评论原文
    pub text: String,
}

/// 一页评论及下一页的续传令牌（令牌缺失表示已到末尾）
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    pub items: Vec<RawComment>,
    pub next_page_token: Option<String>,
}

/// 分页评论流接口
#[async_trait]
pub trait CommentFeed: Send + Sync {
    /// 请求一页顶层评论
    ///
    /// # 参数
    /// * `video_id` - 视频ID
    /// * `page_size` - 页大小（≤100）
    /// * `page_token` - 上一页返回的续传令牌，首页为None
    async fn fetch_page(
        &self,
        video_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<CommentPage>;

    /// 来源名称（日志用）
    fn name(&self) -> &str;
}

/// 评论收集器 - 驱动分页循环直到达到目标数量或评论流耗尽
pub struct CommentCollector {
    feed: Arc<dyn CommentFeed>,
}

impl CommentCollector {
    pub fn new(feed: Arc<dyn CommentFeed>) -> Self {
        Self { feed }
    }

    /// 抓取最多 `max_comments` 条顶层评论
    ///
    /// 每条评论入列时立即做文本清洗。请求失败不重试：
    /// 记录错误并返回已累计的部分结果。`max_comments == 0`
    /// 时不发出任何请求。
    pub async fn collect(&self, video_id: &str, max_comments: usize) -> Vec<Comment> {
        let mut comments: Vec<Comment> = Vec::new();

        if max_comments == 0 {
            return comments;
        }

        info!(
            "开始抓取评论（来源: {}）。目标: {} 条",
            self.feed.name(),
            max_comments
        );

        let mut page_token: Option<String> = None;

        while comments.len() < max_comments {
            info!("  正在抓取页面... 当前累计: {}", comments.len());

            let page = match self
                .feed
                .fetch_page(video_id, MAX_PAGE_SIZE, page_token.as_deref())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    // 不重试：保留部分结果立即结束
                    error!(
                        "评论接口请求失败（第{}页）: {}，保留已抓取的 {} 条",
                        comments.len() / MAX_PAGE_SIZE as usize + 1,
                        e,
                        comments.len()
                    );
                    break;
                }
            };

            for item in page.items {
                let normalized = normalizer::normalize(&item.text);
                comments.push(Comment::new(item.author, item.text, normalized));

                // 截断最后一页多出的部分
                if comments.len() >= max_comments {
                    break;
                }
            }

            page_token = page.next_page_token;

            if page_token.is_none() {
                info!("  已到达该视频可用评论的末尾");
                break;
            }
        }

        info!("抓取结束。评论总数: {}", comments.len());
        comments
    }
}
