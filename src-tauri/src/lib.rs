//! # LinguaLens - 双语标注核心与 Tauri 应用初始化
//!
//! 语言学习聊天界面的文本标注引擎：
//! - 模型回复的中英分段对齐（`services::aligner`）
//! - 纠错/优化面板的词级差异（`services::differ`）
//! - 划词分类、上下文提取、浮动按钮定位与自动隐藏（`services::classifier` 等）
//! - 将以上能力组合到消息列表渲染中（`services::renderer`）
//!
//! 核心逻辑不依赖 Tauri，可以独立构建和测试；启用 `desktop` feature 后，
//! `run()` 注册 Tauri commands 并启动桌面应用。
//!
//! ## 模块结构
//! - `commands/` - Tauri command 处理函数（IPC 接口层，`desktop` feature）
//! - `models/` - 数据模型（对应前端 TypeScript 类型）
//! - `services/` - 核心业务逻辑
//! - `utils/` - 通用工具函数

#[cfg(feature = "desktop")]
mod commands;
pub mod models;
pub mod services;
pub mod utils;

pub use services::conversation::Conversation;
pub use services::lookup::LookupSession;
pub use services::lookup_bridge::PendingLookups;
pub use services::renderer::MessageRenderer;

#[cfg(feature = "desktop")]
use std::sync::Arc;

#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};

#[cfg(feature = "desktop")]
use services::config_store;

// 移动端构建时将 `run()` 标记为 Tauri 移动端入口点；桌面端由 `main.rs` 直接调用。
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
/// Tauri 应用启动函数
///
/// 1. 注册会话集合、渲染器与查询对话框为 managed state
/// 2. 注册所有自定义 Tauri commands
/// 3. 在 `setup` 钩子中注册调试日志插件和查询请求桥，并异步加载标注配置
/// 4. 生成应用上下文并启动主事件循环
///
/// # Panics
/// 如果 Tauri 应用启动失败（例如配置文件缺失或窗口创建失败），
/// 将通过 `.expect()` 触发 panic 并输出错误信息。
pub fn run() {
    tauri::Builder::default()
        .manage(Conversation::new())
        .manage(MessageRenderer::default())
        .manage(LookupSession::new())
        .invoke_handler(tauri::generate_handler![
            // 消息 commands
            commands::messages::render_conversation,
            commands::messages::segment_reply,
            commands::messages::diff_sentences,
            commands::messages::append_message,
            commands::messages::attach_corrections,
            commands::messages::edit_message,
            commands::messages::delete_message,
            commands::messages::clear_conversation,
            commands::messages::export_conversation,
            // 划词 commands
            commands::selection::handle_selection,
            commands::selection::dismiss_floating_control,
            commands::selection::trigger_floating_action,
            // 查询对话框 commands
            commands::lookup::current_lookup,
            commands::lookup::toggle_lookup_vocab,
            commands::lookup::run_quick_lookup,
            commands::lookup::run_lookup_analysis,
            commands::lookup::reset_lookup,
            commands::lookup::close_lookup,
            commands::lookup::resolve_lookup,
            // 配置 commands
            commands::settings::read_annotator_config,
            commands::settings::save_annotator_config,
        ])
        .setup(|app| {
            // 仅在开发调试模式下启用日志插件
            if cfg!(debug_assertions) {
                app.handle().plugin(
                    tauri_plugin_log::Builder::default()
                        .level(log::LevelFilter::Info)
                        .build(),
                )?;
            }

            // 查询请求通过事件交给前端执行
            let emitter = app.handle().clone();
            app.manage(PendingLookups::new(Arc::new(move |dispatch| {
                emitter
                    .emit(commands::lookup::LOOKUP_REQUESTED_EVENT, dispatch)
                    .map_err(|e| e.to_string())
            })));

            let handle = app.handle().clone();
            tauri::async_runtime::spawn(async move {
                let loaded = match config_store::default_config_file() {
                    Ok(file) => config_store::load_config(&file).await,
                    Err(e) => Err(e),
                };
                match loaded {
                    Ok(config) => handle.state::<MessageRenderer>().set_config(config),
                    Err(e) => log::warn!("加载标注配置失败，使用默认配置: {}", e),
                }
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
