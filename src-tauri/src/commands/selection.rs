//! # 划词浮动按钮 Tauri Commands
//!
//! 前端在消息列表的 `mouseup` 上调用 `handle_selection`，传入选区快照和视口尺寸；
//! 自动隐藏计时器触发时，后端向前端发送 `floating-control-hidden` 事件。
//!
//! 时间戳使用 Unix 毫秒，前端可直接与 `Date.now()` 比较 `expiresAt`。

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tauri::{AppHandle, Emitter, State};

use crate::models::selection::{FloatingAction, SelectionSnapshot, Viewport};
use crate::services::floating::{DispatchOutcome, HiddenCallback};
use crate::services::lookup::LookupSession;
use crate::services::renderer::MessageRenderer;

/// 浮动按钮自动隐藏时发送给前端的事件名
pub const FLOATING_HIDDEN_EVENT: &str = "floating-control-hidden";

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// 构造向前端发送隐藏事件的回调
fn emit_hidden(app: AppHandle) -> HiddenCallback {
    Arc::new(move || {
        if let Err(e) = app.emit(FLOATING_HIDDEN_EVENT, ()) {
            log::warn!("发送浮动按钮隐藏事件失败: {}", e);
        }
    })
}

/// 处理一次划词
///
/// # 参数
/// - `snapshot` - 选区文本、容器文本和包围矩形
/// - `viewport` - 视口尺寸
///
/// # 返回值
/// 浮动按钮的新状态（可见时包含锚点坐标和可用操作所需的 `singleWord`）
#[tauri::command]
pub async fn handle_selection(
    snapshot: SelectionSnapshot,
    viewport: Viewport,
    app: AppHandle,
    renderer: State<'_, MessageRenderer>,
) -> Result<DispatchOutcome, String> {
    Ok(renderer.on_mouse_up(snapshot, viewport, now_millis(), emit_hidden(app)))
}

/// 关闭浮动按钮
#[tauri::command]
pub async fn dismiss_floating_control(
    app: AppHandle,
    renderer: State<'_, MessageRenderer>,
) -> Result<DispatchOutcome, String> {
    Ok(renderer.dismiss(emit_hidden(app)))
}

/// 点击浮动按钮上的操作
///
/// 返回结果中的 `lookup` 为交给查询对话框的请求，同时在后端打开对话框；
/// 按钮不可见或对短语点击"快速查询"时 `lookup` 为空，对话框保持原状。
#[tauri::command]
pub async fn trigger_floating_action(
    action: FloatingAction,
    app: AppHandle,
    renderer: State<'_, MessageRenderer>,
    session: State<'_, LookupSession>,
) -> Result<DispatchOutcome, String> {
    let outcome = renderer.trigger(action, emit_hidden(app));
    session.open_from(&outcome).await;
    Ok(outcome)
}
