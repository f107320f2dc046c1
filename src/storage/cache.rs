// 评论缓存 - CSV文件的原子写入与读取

use super::models::CommentRecord;
use crate::models::{Comment, VideoTarget};
use crate::normalizer;
use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// 评论缓存（每个视频一个CSV文件，UTF-8，带表头）
pub struct CommentCache {
    dir: PathBuf,
}

impl CommentCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// 某个视频的缓存文件路径
    pub fn path_for(&self, target: &VideoTarget) -> PathBuf {
        target.cache_path(&self.dir)
    }

    /// 覆盖写入某个视频的全部评论
    ///
    /// 先写入同目录下的临时文件再原子替换，避免写到一半的
    /// 缓存被并发读取。
    pub fn save(&self, target: &VideoTarget, comments: &[Comment]) -> Result<()> {
        let path = self.path_for(target);
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("缓存路径没有父目录: {}", path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("无法创建缓存目录: {}", parent.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .context("无法创建缓存临时文件")?;

        {
            let mut writer = csv::Writer::from_writer(&mut tmp);
            for comment in comments {
                writer.serialize(CommentRecord::from(comment))?;
            }
            writer.flush()?;
        }
        tmp.as_file_mut().flush()?;

        tmp.persist(&path)
            .map_err(|e| anyhow!("无法替换缓存文件 {}: {}", path.display(), e))?;

        info!("评论已保存到缓存: {} ({} 条)", path.display(), comments.len());
        Ok(())
    }

    /// 读取某个视频的缓存评论
    ///
    /// 只信任 `autor` 和 `texto_original` 两列：清洗结果现场重算，
    /// 存储的情感标签被丢弃（每次运行都重新分类）。
    pub fn load(&self, target: &VideoTarget) -> Result<Vec<Comment>> {
        let path = self.path_for(target);
        Self::load_from(&path)
    }

    fn load_from(path: &Path) -> Result<Vec<Comment>> {
        if !path.exists() {
            return Err(anyhow!("缓存文件不存在: {}", path.display()));
        }

        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("无法打开缓存文件: {}", path.display()))?;

        let mut comments = Vec::new();
        for record in reader.deserialize() {
            let record: CommentRecord =
                record.with_context(|| format!("缓存文件格式错误: {}", path.display()))?;
            let normalized = normalizer::normalize(&record.texto_original);
            comments.push(Comment::new(
                record.autor,
                record.texto_original,
                normalized,
            ));
        }

        info!("从缓存读取评论: {} ({} 条)", path.display(), comments.len());
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn target(id: &str) -> VideoTarget {
        VideoTarget {
            id: id.to_string(),
            title: "test".to_string(),
            cache_file: None,
        }
    }

    #[test]
    fn test_round_trip_recomputes_normalization_and_drops_sentiment() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CommentCache::new(dir.path().to_path_buf());
        let video = target("abc");

        let mut comment = Comment::new(
            "ana".to_string(),
            "Me ENCANTA http://x.co".to_string(),
            "texto procesado obsoleto".to_string(), // 故意存一个过期的清洗结果
        );
        comment.sentiment = Some(Sentiment::Positive);

        cache.save(&video, &[comment]).unwrap();
        let loaded = cache.load(&video).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].author, "ana");
        assert_eq!(loaded[0].raw_text, "Me ENCANTA http://x.co");
        // 清洗结果重算，不信任缓存里的旧值
        assert_eq!(loaded[0].normalized_text, "me encanta");
        // 情感标签被丢弃，总是重新分类
        assert!(loaded[0].sentiment.is_none());
    }

    #[test]
    fn test_missing_cache_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CommentCache::new(dir.path().to_path_buf());

        let err = cache.load(&target("nope")).unwrap_err();
        assert!(err.to_string().contains("缓存文件不存在"));
    }

    #[test]
    fn test_malformed_cache_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CommentCache::new(dir.path().to_path_buf());
        let video = target("bad");

        // 行中途截断的CSV
        std::fs::write(
            cache.path_for(&video),
            "autor,texto_original,texto_procesado,sentimiento\n\"ana,rota\n",
        )
        .unwrap();

        assert!(cache.load(&video).is_err());
    }

    #[test]
    fn test_save_overwrites_previous_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CommentCache::new(dir.path().to_path_buf());
        let video = target("v");

        let first = vec![Comment::new(
            "a".to_string(),
            "uno".to_string(),
            "uno".to_string(),
        )];
        let second = vec![
            Comment::new("b".to_string(), "dos".to_string(), "dos".to_string()),
            Comment::new("c".to_string(), "tres".to_string(), "tres".to_string()),
        ];

        cache.save(&video, &first).unwrap();
        cache.save(&video, &second).unwrap();

        let loaded = cache.load(&video).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].author, "b");
    }
}
