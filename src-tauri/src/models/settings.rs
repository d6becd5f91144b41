//! # 标注核心配置数据模型
//!
//! 定义了 `AnnotatorConfig`：分段阈值、上下文半径、浮动按钮尺寸和自动隐藏时长。
//! 配置对象显式传入每个核心入口函数，核心逻辑从不读取全局状态。
//!
//! 对应前端 TypeScript 接口：
//! ```typescript
//! interface AnnotatorConfig {
//!   chunkWordThreshold: number;
//!   contextRadius: number;
//!   controlWidth: number;
//!   controlHeight: number;
//!   controlPadding: number;
//!   autoHideMs: number;
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 标注核心配置
///
/// 存储在 `~/.mo/LinguaLens/annotator-config.json`，每个字段都有默认值，
/// 旧版本配置文件缺少字段时按默认值补齐。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnotatorConfig {
    /// 分段字数阈值：单句或累计字数超过该值时切出一个展示块
    pub chunk_word_threshold: usize,
    /// 上下文窗口半径（字符数），选中文本前后各取这么多字符
    pub context_radius: usize,
    /// 浮动按钮估算宽度（像素）
    pub control_width: f64,
    /// 浮动按钮估算高度（像素）
    pub control_height: f64,
    /// 浮动按钮与视口边缘、选区之间的间距（像素）
    pub control_padding: f64,
    /// 浮动按钮自动隐藏时长（毫秒）
    pub auto_hide_ms: u64,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            chunk_word_threshold: 8,
            context_radius: 50,
            control_width: 120.0,
            control_height: 40.0,
            control_padding: 10.0,
            auto_hide_ms: 8000,
        }
    }
}

impl AnnotatorConfig {
    pub fn auto_hide(&self) -> Duration {
        Duration::from_millis(self.auto_hide_ms)
    }
}
