//! 分词：中英混合文本切分为小写词序列
//!
//! 含 CJK 字符时使用 jieba 精确模式（HMM 开启），纯 ASCII 文本按空白切分。
//! 保留词序与重复（TF 统计需要），过滤纯标点与空白片段。

use std::sync::OnceLock;

use jieba_rs::Jieba;

/// 全局 Jieba 实例（词典加载较重，延迟初始化一次）
static JIEBA: OnceLock<Jieba> = OnceLock::new();

fn get_jieba() -> &'static Jieba {
    JIEBA.get_or_init(Jieba::new)
}

/// 判断字符是否为 CJK（中日韩）字符
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}' |   // CJK Unified Ideographs
        '\u{3400}'..='\u{4DBF}' |   // CJK Unified Ideographs Extension A
        '\u{F900}'..='\u{FAFF}' |   // CJK Compatibility Ideographs
        '\u{3040}'..='\u{309F}' |   // Hiragana
        '\u{30A0}'..='\u{30FF}'     // Katakana
    )
}

/// 判断文本是否包含 CJK 字符
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// 分词：根据文本内容自动选择策略
/// - 包含 CJK 字符时使用 jieba 分词
/// - 纯 ASCII 时按空白切分
///
/// 空白输入返回空 Vec。
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    if contains_cjk(text) {
        get_jieba()
            .cut(text, true)
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| s.chars().any(|c| c.is_alphanumeric() || is_cjk(c)))
            .collect()
    } else {
        text.split_whitespace().map(|s| s.to_lowercase()).collect()
    }
}
