//! # 划词查询对话框 Tauri Commands
//!
//! `trigger_floating_action` 产生查询请求后，对话框状态保存在后端的 `LookupSession` 中。
//! 查询本身的网络调用由前端完成：后端发送 `lookup-requested` 事件，
//! 前端完成调用后通过 `resolve_lookup` 交回结果。

use serde_json::Value;
use tauri::State;

use crate::services::lookup::{LookupFlow, LookupSession};
use crate::services::lookup_bridge::PendingLookups;

/// 请求前端执行查询时发送的事件名
pub const LOOKUP_REQUESTED_EVENT: &str = "lookup-requested";

/// 当前对话框状态，未打开时为空
#[tauri::command]
pub async fn current_lookup(
    session: State<'_, LookupSession>,
) -> Result<Option<LookupFlow>, String> {
    Ok(session.current().await)
}

/// 勾选或取消勾选一个候选生词
#[tauri::command]
pub async fn toggle_lookup_vocab(
    word: String,
    session: State<'_, LookupSession>,
) -> Result<LookupFlow, String> {
    session.toggle_vocab(&word).await
}

/// 快速查询选中的单词
#[tauri::command]
pub async fn run_quick_lookup(
    session: State<'_, LookupSession>,
    bridge: State<'_, PendingLookups>,
) -> Result<LookupFlow, String> {
    session.quick_query(bridge.inner()).await
}

/// 按勾选的生词解析句子
#[tauri::command]
pub async fn run_lookup_analysis(
    session: State<'_, LookupSession>,
    bridge: State<'_, PendingLookups>,
) -> Result<LookupFlow, String> {
    session.analyze(bridge.inner()).await
}

/// 回到生词选择步骤
#[tauri::command]
pub async fn reset_lookup(session: State<'_, LookupSession>) -> Result<LookupFlow, String> {
    session.reset_to_selection().await
}

#[tauri::command]
pub async fn close_lookup(session: State<'_, LookupSession>) -> Result<(), String> {
    session.close().await;
    Ok(())
}

/// 前端交回查询结果
///
/// # 参数
/// - `request_id` - `lookup-requested` 事件中的请求 ID
/// - `result` - 查询结果（成功时）
/// - `error` - 失败原因（失败时）
///
/// # 返回值
/// 请求已超时或 ID 未知时返回 `false`
#[tauri::command]
pub async fn resolve_lookup(
    request_id: u64,
    result: Option<Value>,
    error: Option<String>,
    bridge: State<'_, PendingLookups>,
) -> Result<bool, String> {
    let outcome = match (result, error) {
        (_, Some(error)) => Err(error),
        (Some(value), None) => Ok(value),
        (None, None) => Err("查询结果为空".to_string()),
    };
    Ok(bridge.resolve(request_id, outcome))
}
