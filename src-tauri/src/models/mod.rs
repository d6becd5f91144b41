//! # 数据模型模块
//!
//! 定义了与前端 TypeScript 类型一一对应的 Rust 数据结构。
//! 所有结构体均派生 `Serialize`（大多也派生 `Deserialize`），用于 Tauri IPC 传输和 JSON 文件读写。
//! - `message` - 聊天消息、纠错记录、优化记录
//! - `display` - 渲染层推导结构（分段块、差异片段、渲染后的消息）
//! - `selection` - 划词快照、定位结果和浮动按钮状态
//! - `settings` - 标注核心配置

pub mod display;
pub mod message;
pub mod selection;
pub mod settings;
