//! # 消息渲染器（组合根）
//!
//! 将会话消息列表转换为前端可直接渲染的 `RenderedMessage` 列表，并持有划词浮动按钮的状态槽。
//!
//! ## 渲染流程
//! 1. **并行 map**：使用 rayon 对每条消息独立推导正文模式和纠错面板
//! 2. **按序收集**：`collect` 保持消息原始顺序（旧→新）
//!
//! ## 正文模式
//! - assistant + 非空翻译 → `aligner::segment` 分段；只得到一块时回退为 `SingleTranslation`
//! - 其余消息 → `Plain`，原样交给 Markdown 渲染器
//!
//! ## 纠错面板
//! 仅 user 消息：纠错记录至少有一条纠错项，或存在优化记录时生成；
//! 每条纠错项与整句优化都通过 `differ::diff` 生成高亮片段。
//!
//! ## 划词
//! `on_mouse_up` → `SelectionSlot::dispatch`，依次经过分类、上下文提取、定位与自动隐藏调度。

use std::sync::{Arc, RwLock};

use rayon::prelude::*;

use crate::models::display::{
    CorrectionItemView, CorrectionPanel, CorrectionView, MessageBody, OptimizationView,
    RenderedMessage,
};
use crate::models::message::{CorrectionRecord, Message, OptimizationRecord, Role};
use crate::models::selection::{FloatingAction, SelectionSnapshot, SelectionState, Viewport};
use crate::models::settings::AnnotatorConfig;
use crate::services::aligner;
use crate::services::differ;
use crate::services::floating::{ControlEvent, DispatchOutcome, HiddenCallback, SelectionSlot};

/// 渲染入口：将消息列表转换为渲染结果
///
/// # 参数
/// - `messages` - 会话消息（创建顺序）
/// - `config` - 标注配置
///
/// # 返回值
/// 与输入一一对应、顺序一致的渲染结果
pub fn render_messages(messages: &[Message], config: &AnnotatorConfig) -> Vec<RenderedMessage> {
    messages
        .par_iter()
        .map(|msg| render_message(msg, config))
        .collect()
}

/// 渲染单条消息
pub fn render_message(msg: &Message, config: &AnnotatorConfig) -> RenderedMessage {
    let is_user = msg.role == Role::User;
    RenderedMessage {
        id: msg.id,
        role: msg.role,
        body: render_body(msg, config),
        editable: is_user,
        is_edited: msg.is_edited,
        panel: if is_user {
            build_panel(msg.corrections.as_ref(), msg.optimization.as_ref())
        } else {
            None
        },
    }
}

/// 决定消息正文的渲染模式
fn render_body(msg: &Message, config: &AnnotatorConfig) -> MessageBody {
    let translation = match (msg.role, msg.translation.as_deref()) {
        (Role::Assistant, Some(t)) if !t.trim().is_empty() => t,
        _ => {
            return MessageBody::Plain {
                markdown: msg.content.clone(),
            };
        }
    };

    let chunks = aligner::segment(&msg.content, Some(translation), config.chunk_word_threshold);
    if chunks.len() <= 1 {
        MessageBody::SingleTranslation {
            markdown: msg.content.clone(),
            translation: translation.to_string(),
        }
    } else {
        MessageBody::Segmented { chunks }
    }
}

/// 构建"智能优化建议"面板
///
/// # 返回值
/// 既没有有效纠错项也没有优化记录时返回 `None`
pub fn build_panel(
    corrections: Option<&CorrectionRecord>,
    optimization: Option<&OptimizationRecord>,
) -> Option<CorrectionPanel> {
    let corrections = corrections
        .filter(|record| !record.corrections.is_empty())
        .map(correction_view);
    let optimization = optimization.map(optimization_view);

    if corrections.is_none() && optimization.is_none() {
        return None;
    }

    let summary = corrections
        .as_ref()
        .map(|view| format!("发现 {} 处问题", view.items.len()));
    Some(CorrectionPanel {
        corrections,
        optimization,
        summary,
    })
}

fn correction_view(record: &CorrectionRecord) -> CorrectionView {
    let items = record
        .corrections
        .iter()
        .enumerate()
        .map(|(index, entry)| CorrectionItemView {
            ordinal: index + 1,
            kind: entry.kind,
            label: entry.kind.label(),
            segments: differ::diff(&entry.original, &entry.corrected),
            explanation: entry.explanation.clone(),
        })
        .collect();

    CorrectionView {
        original_sentence: record.original_sentence.clone(),
        corrected_sentence: record.corrected_sentence.clone(),
        items,
        overall_comment: record
            .overall_comment
            .clone()
            .filter(|comment| !comment.trim().is_empty()),
    }
}

fn optimization_view(record: &OptimizationRecord) -> OptimizationView {
    OptimizationView {
        original_sentence: record.original_sentence.clone(),
        optimized_sentence: record.optimized_sentence.clone(),
        segments: differ::diff(&record.original_sentence, &record.optimized_sentence),
        scoring: record.scoring_analysis.map(|s| s.clamped()),
        current_score_range: record.current_score_range.clone(),
        target_score_range: record.target_score_range.clone(),
        improvements: record.improvements.clone(),
        tips: record.tips.clone(),
    }
}

/// 浮动按钮上应提供的操作
///
/// 单个单词同时提供"快速查询"与"句子解析"，短语/句子只提供"句子解析"。
pub fn floating_actions(selection: &SelectionState) -> Vec<FloatingAction> {
    if selection.single_word {
        vec![FloatingAction::QuickLookup, FloatingAction::Analyze]
    } else {
        vec![FloatingAction::Analyze]
    }
}

/// 消息列表渲染器
///
/// 持有显式传入的配置和唯一的划词状态槽，不读取任何全局状态。
/// 在桌面端注册为 Tauri managed state，供 commands 并发访问。
pub struct MessageRenderer {
    config: RwLock<AnnotatorConfig>,
    selection: Arc<SelectionSlot>,
}

impl MessageRenderer {
    pub fn new(config: AnnotatorConfig) -> Self {
        Self {
            config: RwLock::new(config),
            selection: SelectionSlot::new(),
        }
    }

    /// 当前配置的克隆
    pub fn config(&self) -> AnnotatorConfig {
        self.config.read().map(|c| c.clone()).unwrap_or_default()
    }

    /// 替换配置（设置保存后调用）
    pub fn set_config(&self, config: AnnotatorConfig) {
        if let Ok(mut current) = self.config.write() {
            *current = config;
        }
    }

    pub fn render(&self, messages: &[Message]) -> Vec<RenderedMessage> {
        render_messages(messages, &self.config())
    }

    pub fn selection(&self) -> &Arc<SelectionSlot> {
        &self.selection
    }

    /// 处理消息列表上的 `mouseup`
    ///
    /// # 参数
    /// - `snapshot` - 选区快照
    /// - `viewport` - 视口尺寸
    /// - `now_ms` - 当前时间（Unix 毫秒），用于计算 `expires_at`
    /// - `on_hidden` - 自动隐藏触发时的通知
    pub fn on_mouse_up(
        &self,
        snapshot: SelectionSnapshot,
        viewport: Viewport,
        now_ms: u64,
        on_hidden: HiddenCallback,
    ) -> DispatchOutcome {
        let event = ControlEvent::Selection {
            snapshot,
            viewport,
            now_ms,
        };
        self.selection.dispatch(event, &self.config(), on_hidden)
    }

    /// 主动关闭浮动按钮
    pub fn dismiss(&self, on_hidden: HiddenCallback) -> DispatchOutcome {
        self.selection
            .dispatch(ControlEvent::Dismiss, &self.config(), on_hidden)
    }

    /// 点击浮动按钮上的操作
    ///
    /// 返回结果中的 `lookup` 即交给查询流程的请求；`clear_dom_selection` 为 true 时前端应调用
    /// `window.getSelection().removeAllRanges()`。
    pub fn trigger(&self, action: FloatingAction, on_hidden: HiddenCallback) -> DispatchOutcome {
        self.selection
            .dispatch(ControlEvent::Action(action), &self.config(), on_hidden)
    }
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new(AnnotatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::display::{DiffSegment, SegmentClass};
    use crate::models::message::{CorrectionEntry, CorrectionKind, ScoringAnalysis};
    use crate::models::selection::Rect;
    use crate::services::floating::ControlState;

    fn noop() -> HiddenCallback {
        Arc::new(|| {})
    }

    #[test]
    fn test_assistant_reply_is_segmented() {
        let msg = Message::assistant(
            2,
            "I like apples. I also like the delicious oranges \
             I bought yesterday from the new market downtown.",
            Some("我喜欢苹果。我也喜欢我昨天从城里新市场买的美味橙子。".into()),
        );
        let rendered = render_message(&msg, &AnnotatorConfig::default());
        match rendered.body {
            MessageBody::Segmented { chunks } => {
                assert_eq!(chunks.len(), 2);
                assert_eq!(chunks[0].english_text, "I like apples.");
                assert_eq!(chunks[0].chinese_text, "我喜欢苹果。");
            }
            other => panic!("unexpected body {:?}", other),
        }
        assert!(!rendered.editable);
        assert!(rendered.panel.is_none());
    }

    #[test]
    fn test_single_chunk_falls_back_to_single_translation() {
        let msg = Message::assistant(3, "Hello there.", Some("你好。".into()));
        let rendered = render_message(&msg, &AnnotatorConfig::default());
        assert_eq!(
            rendered.body,
            MessageBody::SingleTranslation {
                markdown: "Hello there.".into(),
                translation: "你好。".into()
            }
        );
    }

    #[test]
    fn test_assistant_without_translation_is_plain() {
        let msg = Message::assistant(4, "**Bold** reply.", None);
        let rendered = render_message(&msg, &AnnotatorConfig::default());
        assert_eq!(
            rendered.body,
            MessageBody::Plain {
                markdown: "**Bold** reply.".into()
            }
        );
    }

    #[test]
    fn test_user_panel_with_diffs() {
        let mut msg = Message::user(1, "i has a apple");
        msg.corrections = Some(CorrectionRecord {
            original_sentence: "i has a apple".into(),
            corrected_sentence: "I have an apple.".into(),
            corrections: vec![CorrectionEntry {
                kind: CorrectionKind::Grammar,
                original: "i has".into(),
                corrected: "I have".into(),
                explanation: "主语 'I' 应使用 'have'。".into(),
            }],
            overall_comment: Some("  ".into()),
        });
        msg.optimization = Some(OptimizationRecord {
            original_sentence: "I have an apple.".into(),
            optimized_sentence: "I own a fresh apple.".into(),
            scoring_analysis: Some(ScoringAnalysis {
                clarity: 7.0,
                coherence: 4.0,
                accuracy: 4.0,
                vocabulary: 3.0,
            }),
            ..Default::default()
        });

        let rendered = render_message(&msg, &AnnotatorConfig::default());
        assert!(rendered.editable);
        let panel = rendered.panel.expect("panel");
        assert_eq!(panel.summary.as_deref(), Some("发现 1 处问题"));

        let corrections = panel.corrections.expect("corrections");
        assert_eq!(corrections.overall_comment, None);
        let item = &corrections.items[0];
        assert_eq!(item.ordinal, 1);
        assert_eq!(item.label, "语法");
        assert_eq!(
            item.segments,
            vec![
                DiffSegment::new("i", SegmentClass::Removed),
                DiffSegment::new("I", SegmentClass::Added),
                DiffSegment::new("has", SegmentClass::Removed),
                DiffSegment::new("have", SegmentClass::Added),
            ]
        );

        let optimization = panel.optimization.expect("optimization");
        assert_eq!(optimization.scoring.map(|s| s.clarity), Some(5.0));
        assert_eq!(optimization.segments[0], DiffSegment::new("I", SegmentClass::Unchanged));
    }

    #[test]
    fn test_empty_corrections_without_optimization_has_no_panel() {
        let mut msg = Message::user(1, "I have an apple.");
        msg.corrections = Some(CorrectionRecord {
            original_sentence: "I have an apple.".into(),
            corrected_sentence: "I have an apple.".into(),
            ..Default::default()
        });
        assert!(render_message(&msg, &AnnotatorConfig::default()).panel.is_none());
    }

    #[test]
    fn test_render_preserves_order_and_edited_flag() {
        let mut edited = Message::user(1, "first");
        edited.is_edited = true;
        let messages = vec![
            edited,
            Message::assistant(2, "second", None),
            Message::error(3, "错误: timeout"),
        ];
        let rendered = MessageRenderer::default().render(&messages);
        let ids: Vec<u64> = rendered.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(rendered[0].is_edited);
        assert!(!rendered[2].editable);
    }

    #[tokio::test]
    async fn test_mouse_up_drives_floating_control() {
        let renderer = MessageRenderer::default();
        let snapshot = SelectionSnapshot {
            text: " well-known ".into(),
            container_text: Some("It is a well-known fact that practice helps.".into()),
            rect: Rect::new(5.0, 200.0, 10.0, 18.0),
        };
        let viewport = Viewport {
            width: 800.0,
            height: 600.0,
        };

        let outcome = renderer.on_mouse_up(snapshot, viewport, 0, noop());
        let ControlState::Visible(sel) = outcome.state else {
            panic!("expected visible control");
        };
        assert_eq!(sel.selected_text, "well-known");
        assert_eq!(sel.anchor_point.x, 70.0);
        assert_eq!(
            floating_actions(&sel),
            vec![FloatingAction::QuickLookup, FloatingAction::Analyze]
        );

        let outcome = renderer.trigger(FloatingAction::QuickLookup, noop());
        assert!(outcome.clear_dom_selection);
        let request = outcome.lookup.expect("lookup request");
        assert_eq!(request.selected_text, "well-known");
        assert!(request.context_window.contains("well-known fact"));
        assert!(!renderer.selection().current().is_visible());
    }
}
