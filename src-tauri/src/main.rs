//! # LinguaLens - Tauri 桌面应用原生入口点
//!
//! `main.rs` 仅负责启动应用，核心逻辑位于 `lib.rs` 中。
//! 需要启用 `desktop` feature 才会编译此二进制。

// 在 Windows 平台的 Release 构建中隐藏控制台窗口，请勿移除此属性！
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

fn main() {
    app_lib::run();
}
