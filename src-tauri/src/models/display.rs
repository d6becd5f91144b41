//! # 显示层数据模型
//!
//! 定义了前端渲染所需的独立数据结构，每次渲染时由原始 `Message` 重新推导，从不持久化。
//!
//! ## 设计原则
//! - **纯推导**：`DisplayChunk` 与 `DiffSegment` 是输入的纯函数，相同输入必然得到相同输出
//! - **前端纯渲染**：前端只负责把这些结构映射为标记，不做任何文本切分或比对
//!
//! ## 数据流
//! ```text
//! Vec<Message> → renderer::render_messages → Vec<RenderedMessage>
//!              ├─ assistant：aligner::segment → MessageBody::Segmented / SingleTranslation
//!              └─ user：differ::diff → CorrectionPanel
//! ```

use serde::{Deserialize, Serialize};

use crate::models::message::{CorrectionKind, ImprovementNote, Role, ScoringAnalysis};

/// 差异片段的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentClass {
    Unchanged,
    Removed,
    Added,
}

/// 词级差异片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    pub text: String,
    #[serde(rename = "type")]
    pub class: SegmentClass,
}

impl DiffSegment {
    pub fn new(text: impl Into<String>, class: SegmentClass) -> Self {
        Self {
            text: text.into(),
            class,
        }
    }
}

/// 双语分段展示块：一段英文及其对应的中文翻译
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayChunk {
    pub english_text: String,
    /// 无对应翻译时为空字符串
    pub chinese_text: String,
}

/// 消息正文的渲染模式
///
/// 由渲染层根据角色、翻译是否存在以及分段数量决定，前端按 `mode` 选择布局。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum MessageBody {
    /// 原样交给 Markdown 渲染器（user / error 消息，或没有翻译的 assistant 消息）
    Plain { markdown: String },
    /// 分段结果不超过一块：整段正文 + 单个翻译块
    SingleTranslation { markdown: String, translation: String },
    /// 多块双语分段
    Segmented { chunks: Vec<DisplayChunk> },
}

/// 单条纠错项的展示数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionItemView {
    /// 从 1 开始的序号（徽章上的 `#N`）
    pub ordinal: usize,
    pub kind: CorrectionKind,
    pub label: &'static str,
    pub segments: Vec<DiffSegment>,
    pub explanation: String,
}

/// 纠错标签页
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionView {
    pub original_sentence: String,
    pub corrected_sentence: String,
    pub items: Vec<CorrectionItemView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_comment: Option<String>,
}

/// 写作优化标签页
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationView {
    pub original_sentence: String,
    pub optimized_sentence: String,
    /// 原句与优化句的整句差异
    pub segments: Vec<DiffSegment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_score_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_score_range: Option<String>,
    pub improvements: Vec<ImprovementNote>,
    pub tips: Vec<String>,
}

/// 用户消息下方的"智能优化建议"面板
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectionPanel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrections: Option<CorrectionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationView>,
    /// 折叠状态下的摘要，如 "发现 2 处问题"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// 渲染完成的单条消息（前端唯一数据源）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedMessage {
    pub id: u64,
    pub role: Role,
    pub body: MessageBody,
    /// 仅 user 消息可编辑/删除
    pub editable: bool,
    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panel: Option<CorrectionPanel>,
}
