// 数据模型定义 - 缓存文件的行结构

use crate::models::{Comment, Sentiment};
use serde::{Deserialize, Serialize};

/// 缓存文件中的一行评论
///
/// 列名是缓存格式契约的一部分，读写双方都按此结构序列化。
/// `sentimiento` 列仅为人工查看方便而写入，读取时被忽略
/// （清洗和分类总是重新计算）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRecord {
    pub autor: String,
    pub texto_original: String,
    pub texto_procesado: String,
    pub sentimiento: Option<Sentiment>,
}

impl From<&Comment> for CommentRecord {
    fn from(comment: &Comment) -> Self {
        Self {
            autor: comment.author.clone(),
            texto_original: comment.raw_text.clone(),
            texto_procesado: comment.normalized_text.clone(),
            sentimiento: comment.sentiment,
        }
    }
}
