// 文本清洗模块 - 分类前去除URL、HTML实体/标签并统一大小写

use regex::Regex;
use std::sync::OnceLock;

// 使用 OnceLock 缓存正则表达式对象
static URL_PATTERN: OnceLock<Regex> = OnceLock::new();
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    // 匹配到下一个空白符为止的链接片段
    URL_PATTERN.get_or_init(|| Regex::new(r"http\S+|www\S+|https\S+").unwrap())
}

fn tag_pattern() -> &'static Regex {
    // 非贪婪匹配 <...> 形式的标签
    TAG_PATTERN.get_or_init(|| Regex::new(r"<.*?>").unwrap())
}

/// 清洗评论文本（纯函数，确定性，可重复应用）
///
/// 步骤顺序不可调换：
/// 1. 删除URL片段
/// 2. 全部转小写
/// 3. 将 `&quot;` 和 `&#39;` 实体替换为空格
/// 4. 删除 `<...>` 标签
/// 5. 去除首尾空白
pub fn normalize(raw: &str) -> String {
    let text = url_pattern().replace_all(raw, "");
    let text = text.to_lowercase();
    let text = text.replace("&quot;", " ");
    let text = text.replace("&#39;", " ");
    let text = tag_pattern().replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_urls_and_tags() {
        // 端到端样例：URL与标签被删除，全文小写，首尾空白去除
        let raw = "Me encanta!! http://x.co <b>bien</b>";
        assert_eq!(normalize(raw), "me encanta!!  bien");
    }

    #[test]
    fn test_no_url_substring_survives() {
        let cases = [
            "mira esto http://ejemplo.com/video",
            "www.ejemplo.com es genial",
            "https://youtu.be/abc123 final",
        ];
        for raw in cases {
            let cleaned = normalize(raw);
            assert!(!cleaned.contains("http"), "quedó URL en: {}", cleaned);
            assert!(!cleaned.contains("www"), "quedó URL en: {}", cleaned);
        }
    }

    #[test]
    fn test_replaces_html_entities_with_space() {
        assert_eq!(normalize("dijo &quot;hola&#39;"), "dijo  hola");
    }

    #[test]
    fn test_idempotent() {
        let raw = "Gran <i>video</i> www.x.co &quot;TOP&quot;";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }
}
