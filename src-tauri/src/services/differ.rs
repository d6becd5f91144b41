//! # 词级差异比对
//!
//! 计算原句与修正句（或优化句）之间的词级差异，供纠错面板高亮渲染。
//!
//! ## 算法
//! 这是逐位置比对，而不是最小编辑距离：两个指针同步前进，同位置词相同则输出
//! `unchanged`，不同则先输出原句的词为 `removed`，再输出修正句的词为 `added`。
//! 长度不同的插入/删除会产生一串"先删后增"的片段，而不会重新对齐。
//!
//! 空白 token 参与位置推进，但不出现在输出中。

use crate::models::display::{DiffSegment, SegmentClass};

/// 按空白切分字符串，保留空白 token
///
/// 切分结果中非空白与空白 token 交替出现：字符串以空白开头时首个 token 为空串，
/// 以空白结尾时末尾 token 为空串。例如 `" a b"` → `["", " ", "a", " ", "b"]`。
/// 这样两侧首尾空白不一致时，指针错位的方式保持稳定。
fn split_keep_whitespace(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match in_space {
            None => {
                if is_space {
                    tokens.push("");
                }
            }
            Some(prev) if prev != is_space => {
                tokens.push(&text[start..idx]);
                start = idx;
            }
            _ => {}
        }
        in_space = Some(is_space);
    }

    match in_space {
        None => tokens.push(""),
        Some(last_is_space) => {
            tokens.push(&text[start..]);
            if last_is_space {
                tokens.push("");
            }
        }
    }
    tokens
}

/// 纯空白（含空串）的 token 不输出
fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

/// 计算词级差异
///
/// # 参数
/// - `original` - 原句
/// - `corrected` - 修正句或优化句
///
/// # 返回值
/// 按从左到右顺序排列的差异片段；任一侧为空或两句相同时，
/// 返回一个包含非空一侧文本的 `unchanged` 片段。
pub fn diff(original: &str, corrected: &str) -> Vec<DiffSegment> {
    if original.is_empty() || corrected.is_empty() || original == corrected {
        let text = if original.is_empty() { corrected } else { original };
        return vec![DiffSegment::new(text, SegmentClass::Unchanged)];
    }

    let original_tokens = split_keep_whitespace(original);
    let corrected_tokens = split_keep_whitespace(corrected);
    let mut segments = Vec::new();

    let (mut o, mut c) = (0, 0);
    while o < original_tokens.len() || c < corrected_tokens.len() {
        let o_word = original_tokens.get(o).copied().unwrap_or("");
        let c_word = corrected_tokens.get(c).copied().unwrap_or("");

        if o_word == c_word {
            if !is_blank(o_word) {
                segments.push(DiffSegment::new(o_word, SegmentClass::Unchanged));
            }
            o += 1;
            c += 1;
            continue;
        }

        if o < original_tokens.len() {
            if !is_blank(o_word) {
                segments.push(DiffSegment::new(o_word, SegmentClass::Removed));
            }
            o += 1;
        }
        if c < corrected_tokens.len() {
            if !is_blank(c_word) {
                segments.push(DiffSegment::new(c_word, SegmentClass::Added));
            }
            c += 1;
        }
    }

    segments
}
