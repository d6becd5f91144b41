//! # 划词分类器
//!
//! 判断用户在消息中划选的文本是否可以发起查询，以及它是单个单词还是短语/句子。
//! 两类结果在浮动按钮上启用不同的操作：
//! - 单个单词：同时提供"快速查询"和"句子解析"
//! - 短语/句子：仅提供"句子解析"
//!
//! ## 分类优先级
//! 1. trim 后为空或长度 ≤ 1 → NotQueryable
//! 2. 含有字母、少量连接符以外的字符（数字、中文、其他符号）→ NotQueryable
//! 3. 仅由字母与连字符/撇号构成、不含空白 → SingleWord
//! 4. 其余可查询文本 → Phrase
//!
//! ## 性能策略
//! - 预编译 regex（仅 2 个）：使用 `std::sync::LazyLock`
//! - 早退出：先做长度检查，再跑正则

use std::sync::LazyLock;

use regex::Regex;

/// 划词分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    /// 不可查询：空白、单个字符、含数字/中文/其他符号
    NotQueryable,
    /// 短语或句子：含空白或标点的英文文本
    Phrase,
    /// 单个单词（允许连字符和撇号，如 "well-known"、"don't"）
    SingleWord,
}

/// 可查询英文文本：字母串，之间可用单个连字符/撇号/空白/基础标点连接
///
/// 每个连接符之后的字母串允许为空，因此 "Hello, world" 中的 ", " 也能通过。
static QUERYABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(?:[-'\s.,!?;:][a-zA-Z]*)*$").unwrap());

/// 单个单词：字母串，之间只允许连字符或撇号
static SINGLE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+(?:[-'][a-zA-Z]*)*$").unwrap());

/// 判断文本是否为可查询的英文文本
///
/// # 参数
/// - `text` - 选中的原始文本（可能带首尾空白）
///
/// # 返回值
/// trim 后长度大于 1 且只含英文字母和允许的连接符时返回 true
pub fn is_queryable(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.chars().count() <= 1 {
        return false;
    }
    QUERYABLE_RE.is_match(trimmed)
}

/// 判断文本是否为单个单词
///
/// 注意该判断不检查长度，单个字母 "a" 也算单词；
/// 调用方应先用 `is_queryable` 过滤。
pub fn is_single_word(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return false;
    }
    SINGLE_WORD_RE.is_match(trimmed)
}

/// 划词分类主函数
pub fn classify(text: &str) -> SelectionKind {
    if !is_queryable(text) {
        return SelectionKind::NotQueryable;
    }
    if is_single_word(text) {
        SelectionKind::SingleWord
    } else {
        SelectionKind::Phrase
    }
}
