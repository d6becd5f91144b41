//! # 划词选择数据模型
//!
//! 前端在 `mouseup` 时把 DOM Selection 压缩成 `SelectionSnapshot` 传给 Rust，
//! 核心逻辑只依赖这些纯数据结构，不接触任何真实 DOM，便于脱离浏览器测试。

use serde::{Deserialize, Serialize};

/// 视口坐标系中的点（CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// 选区包围矩形，对应 `Range.getBoundingClientRect()`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// 视口尺寸，对应 `window.innerWidth / innerHeight`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// 一次 `mouseup` 时的选区快照
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionSnapshot {
    /// `selection.toString()` 的原始结果（未 trim）
    pub text: String,
    /// 选区公共祖先所在元素的 `textContent`；取不到时为 `None`
    #[serde(default)]
    pub container_text: Option<String>,
    pub rect: Rect,
}

/// 指示箭头相对浮动按钮的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorPlacement {
    /// 箭头在按钮下方，指向下面的选区（按钮位于选区上方）
    Below,
    /// 箭头在按钮上方，指向上面的选区（上方空间不足，按钮翻转到选区下方）
    Above,
}

/// 定位结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// 按钮水平中心与顶边坐标（前端配合 `translateX(-50%)` 使用）
    pub point: Point,
    pub indicator: IndicatorPlacement,
}

/// 当前唯一的划词状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_text: String,
    pub context_window: String,
    pub anchor_point: Point,
    pub indicator: IndicatorPlacement,
    pub visible: bool,
    /// 自动隐藏的截止时间（毫秒，调用方提供的单调时钟）
    pub expires_at: u64,
    /// 是否为单个单词（决定是否额外提供"快速查询"）
    pub single_word: bool,
}

/// 浮动按钮上的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatingAction {
    /// "句子解析"：多步查询流程
    Analyze,
    /// "快速查询"：仅单词可用，跳过生词选择步骤
    QuickLookup,
}

/// 交给查询协作者的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub selected_text: String,
    pub context_window: String,
    pub quick: bool,
}
