//! # 消息 Tauri Commands
//!
//! 提供会话消息的渲染、追加、纠错挂载、编辑、删除和导出：
//! - `render_conversation` - 将当前会话渲染为前端可直接展示的结构
//! - `segment_reply` / `diff_sentences` - 单独调用分段对齐与词级差异
//! - `append_message` - 追加用户消息、模型回复或错误提示
//! - `attach_corrections` - 为用户消息挂载纠错/优化记录
//! - `edit_message` / `delete_message` / `clear_conversation` - 编辑与删除
//! - `export_conversation` - Markdown/JSON 导出

use tauri::State;

use crate::models::display::{DiffSegment, DisplayChunk, RenderedMessage};
use crate::models::message::{CorrectionRecord, Message, OptimizationRecord, Role};
use crate::services::aligner;
use crate::services::conversation::Conversation;
use crate::services::differ;
use crate::services::export;
use crate::services::renderer::MessageRenderer;

/// 渲染当前会话
///
/// # 返回值
/// 按创建顺序排列的渲染结果
#[tauri::command]
pub async fn render_conversation(
    conversation: State<'_, Conversation>,
    renderer: State<'_, MessageRenderer>,
) -> Result<Vec<RenderedMessage>, String> {
    Ok(renderer.render(&conversation.snapshot()))
}

/// 对一段回复及其翻译做分段对齐
#[tauri::command]
pub async fn segment_reply(
    content: String,
    translation: Option<String>,
    renderer: State<'_, MessageRenderer>,
) -> Result<Vec<DisplayChunk>, String> {
    let threshold = renderer.config().chunk_word_threshold;
    Ok(aligner::segment(&content, translation.as_deref(), threshold))
}

/// 计算两句话的词级差异
#[tauri::command]
pub async fn diff_sentences(
    original: String,
    corrected: String,
) -> Result<Vec<DiffSegment>, String> {
    Ok(differ::diff(&original, &corrected))
}

/// 追加一条消息
///
/// assistant 消息的 `content` 为原始模型回复，按 `正文|||翻译` 格式解析。
///
/// # 参数
/// - `role` - 消息角色（接受 `ai` 作为 `assistant` 的别名）
/// - `content` - 消息文本
#[tauri::command]
pub async fn append_message(
    role: Role,
    content: String,
    conversation: State<'_, Conversation>,
) -> Result<Message, String> {
    match role {
        Role::User => conversation.push_user(&content),
        Role::Assistant => conversation.push_assistant_reply(&content),
        Role::Error => conversation.push_error(&content),
    }
}

/// 为用户消息挂载纠错与优化记录
///
/// # 返回值
/// 至少挂载成功一项时返回 `true`
#[tauri::command]
pub async fn attach_corrections(
    id: u64,
    corrections: Option<CorrectionRecord>,
    optimization: Option<OptimizationRecord>,
    conversation: State<'_, Conversation>,
) -> Result<bool, String> {
    let mut attached = false;
    if let Some(record) = corrections {
        attached |= conversation.attach_corrections(id, record)?;
    }
    if let Some(record) = optimization {
        attached |= conversation.attach_optimization(id, record)?;
    }
    Ok(attached)
}

/// 编辑用户消息文本，空白文本会被拒绝
#[tauri::command]
pub async fn edit_message(
    id: u64,
    text: String,
    conversation: State<'_, Conversation>,
) -> Result<bool, String> {
    conversation.edit_message(id, &text)
}

#[tauri::command]
pub async fn delete_message(
    id: u64,
    conversation: State<'_, Conversation>,
) -> Result<bool, String> {
    conversation.delete_message(id)
}

#[tauri::command]
pub async fn clear_conversation(conversation: State<'_, Conversation>) -> Result<(), String> {
    conversation.clear()
}

/// 导出当前会话
///
/// # 参数
/// - `title` - Markdown 文档标题
/// - `format` - `"markdown"` 或 `"json"`
///
/// # 错误
/// 不支持的导出格式或序列化失败时返回错误
#[tauri::command]
pub async fn export_conversation(
    title: String,
    format: String,
    conversation: State<'_, Conversation>,
    renderer: State<'_, MessageRenderer>,
) -> Result<String, String> {
    let messages = conversation.snapshot();
    match format.as_str() {
        "markdown" => Ok(export::to_markdown(&messages, &title, &renderer.config())),
        "json" => export::to_json(&messages),
        other => Err(format!("不支持的导出格式: {}", other)),
    }
}
