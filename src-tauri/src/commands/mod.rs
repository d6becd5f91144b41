//! # Tauri Command 处理模块
//!
//! 本模块包含所有注册到 Tauri 的 command 处理函数，仅在 `desktop` feature 下编译。
//! 每个子模块对应一个功能域：
//! - `lookup` - 划词查询对话框的状态流转与查询结果回传
//! - `messages` - 会话消息的渲染、追加、编辑、删除和导出
//! - `selection` - 划词浮动按钮的显示、关闭和操作
//! - `settings` - 标注配置的读写

pub mod lookup;
pub mod messages;
pub mod selection;
pub mod settings;
