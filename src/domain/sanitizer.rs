//! 文本清洗
//!
//! 用户提交的标题、描述、分类和段落内容在入库前去掉 HTML 标签，
//! 脚本和样式块连同内容一起删除。

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)\s*>").expect("valid regex")
});

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));

/// 清洗一段文本，返回去掉标签并修剪首尾空白后的结果
pub fn sanitize(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_tags = TAG.replace_all(&without_scripts, "");
    without_tags.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_kept() {
        assert_eq!(sanitize("  Grandma's kitchen  "), "Grandma's kitchen");
    }

    #[test]
    fn test_tags_are_stripped() {
        assert_eq!(sanitize("<b>Summer</b> at the <i>lake</i>"), "Summer at the lake");
    }

    #[test]
    fn test_script_blocks_are_removed() {
        assert_eq!(
            sanitize("Hello<script type=\"text/javascript\">alert('x')</script> there"),
            "Hello there"
        );
        assert_eq!(sanitize("<STYLE>p { color: red }</STYLE>Text"), "Text");
    }
}
