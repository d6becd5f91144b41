//! # 会话导出服务
//!
//! 将会话消息导出为 Markdown 或 JSON 格式的字符串。
//!
//! ## 导出策略
//! - **Markdown**：每条消息一个小节；模型回复按分段对齐结果逐段附上 `>` 引用的翻译，
//!   用户消息的纠错项以 `~~删除~~` / `**新增**` 内联标注
//! - **JSON**：保留消息的完整结构，美化输出

use crate::models::display::{DiffSegment, SegmentClass};
use crate::models::message::{Message, Role};
use crate::models::settings::AnnotatorConfig;
use crate::services::aligner;
use crate::services::differ;

/// 将消息列表导出为 Markdown 格式字符串
///
/// # 参数
/// - `messages` - 会话消息（创建顺序）
/// - `title` - 文档标题
/// - `config` - 标注配置（分段阈值）
///
/// # 返回值
/// Markdown 格式的字符串
pub fn to_markdown(messages: &[Message], title: &str, config: &AnnotatorConfig) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("# {}", title));
    lines.push(String::new());
    lines.push("---".into());
    lines.push(String::new());

    for msg in messages {
        let role = match msg.role {
            Role::User => "用户",
            Role::Assistant => "助手",
            Role::Error => "错误",
        };
        if msg.is_edited {
            lines.push(format!("## {}（已编辑）", role));
        } else {
            lines.push(format!("## {}", role));
        }
        lines.push(String::new());

        match (msg.role, msg.translation.as_deref()) {
            (Role::Assistant, Some(translation)) if !translation.trim().is_empty() => {
                let chunks =
                    aligner::segment(&msg.content, Some(translation), config.chunk_word_threshold);
                for chunk in chunks {
                    lines.push(chunk.english_text);
                    lines.push(String::new());
                    if !chunk.chinese_text.is_empty() {
                        lines.push(format!("> {}", chunk.chinese_text));
                        lines.push(String::new());
                    }
                }
            }
            _ => {
                lines.push(msg.content.clone());
                lines.push(String::new());
            }
        }

        if msg.role == Role::User {
            push_corrections(msg, &mut lines);
        }

        lines.push("---".into());
        lines.push(String::new());
    }

    lines.join("\n")
}

/// 追加用户消息的纠错与优化小节
fn push_corrections(msg: &Message, lines: &mut Vec<String>) {
    if let Some(record) = msg.corrections.as_ref().filter(|r| !r.corrections.is_empty()) {
        lines.push(format!("### 纠错（{} 处）", record.corrections.len()));
        lines.push(String::new());
        for (index, entry) in record.corrections.iter().enumerate() {
            let marked = inline_diff(&differ::diff(&entry.original, &entry.corrected));
            lines.push(format!("{}. [{}] {}", index + 1, entry.kind.label(), marked));
            if !entry.explanation.is_empty() {
                lines.push(format!("   {}", entry.explanation));
            }
        }
        lines.push(String::new());
    }

    if let Some(opt) = &msg.optimization {
        lines.push("### 优化建议".into());
        lines.push(String::new());
        lines.push(inline_diff(&differ::diff(
            &opt.original_sentence,
            &opt.optimized_sentence,
        )));
        lines.push(String::new());
        for tip in &opt.tips {
            lines.push(format!("- {}", tip));
        }
        if !opt.tips.is_empty() {
            lines.push(String::new());
        }
    }
}

/// 把差异片段渲染成单行 Markdown
fn inline_diff(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .map(|seg| match seg.class {
            SegmentClass::Unchanged => seg.text.clone(),
            SegmentClass::Removed => format!("~~{}~~", seg.text),
            SegmentClass::Added => format!("**{}**", seg.text),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 将消息列表导出为 JSON 格式字符串（2 空格缩进）
pub fn to_json(messages: &[Message]) -> Result<String, String> {
    serde_json::to_string_pretty(messages).map_err(|e| format!("序列化会话失败: {}", e))
}
