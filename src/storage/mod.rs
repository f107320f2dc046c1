// 存储模块 - 每个视频的评论CSV缓存

// 子模块
pub mod cache;
pub mod models;

// 重新导出主要类型
pub use cache::CommentCache;
pub use models::CommentRecord;
