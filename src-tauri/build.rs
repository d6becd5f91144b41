//! # LinguaLens - Cargo 构建脚本
//!
//! 启用 `desktop` feature 时调用 `tauri_build::build()`，
//! 根据 `tauri.conf.json` 生成 Tauri 运行时所需的资源绑定和权限清单。
//! 核心库单独构建时不做任何处理。

fn main() {
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
