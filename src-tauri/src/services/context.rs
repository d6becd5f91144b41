//! # 划词上下文提取
//!
//! 从选区所在元素的完整文本中截取选中文本前后各 R 个字符，作为查询时的消歧上下文。
//!
//! 只取选中文本在容器文本中的**第一次**出现位置：同一段文字重复出现时，
//! 得到的可能不是用户实际划选那一处的上下文，这是可接受的近似。
//! 选中文本跨越了内联标记等原因导致在容器中找不到时，上下文退化为空串，
//! 划词流程照常继续。

use crate::models::selection::SelectionSnapshot;
use crate::services::classifier;

/// 提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSelection {
    pub selected_text: String,
    pub context_window: String,
}

/// 在 `haystack` 中查找 `needle` 首次出现处，截取前后各 `radius` 个字符
///
/// 位置与长度均按字符（而非字节）计算，保证中英混排文本不会在 UTF-8 中间截断。
///
/// # 返回值
/// - `Some(window)` - 找到时返回上下文窗口
/// - `None` - 未找到或 needle 为空
pub fn context_window(haystack: &str, needle: &str, radius: usize) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let byte_idx = memchr::memmem::find(haystack.as_bytes(), needle.as_bytes())?;

    let start_char = haystack[..byte_idx].chars().count();
    let needle_chars = needle.chars().count();
    let total_chars = haystack.chars().count();

    let from = start_char.saturating_sub(radius);
    let to = (start_char + needle_chars + radius).min(total_chars);

    Some(haystack.chars().skip(from).take(to - from).collect())
}

/// 从选区快照中提取选中文本和上下文窗口
///
/// # 参数
/// - `snapshot` - 前端传入的选区快照
/// - `radius` - 上下文半径（字符数）
///
/// # 返回值
/// - `Some(extracted)` - 选中文本可查询
/// - `None` - 选中文本为空或不可查询，浮动按钮保持隐藏
pub fn extract(snapshot: &SelectionSnapshot, radius: usize) -> Option<ExtractedSelection> {
    let selected = snapshot.text.trim();
    if selected.is_empty() || !classifier::is_queryable(selected) {
        return None;
    }

    let context = snapshot
        .container_text
        .as_deref()
        .and_then(|container| context_window(container, selected, radius))
        .unwrap_or_else(|| {
            log::debug!("选中文本未在容器文本中找到，上下文置空: {}", selected);
            String::new()
        });

    Some(ExtractedSelection {
        selected_text: selected.to_string(),
        context_window: context,
    })
}
