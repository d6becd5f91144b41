//! # 通用工具函数
//!
//! - `path` - 配置目录路径

pub mod path;
