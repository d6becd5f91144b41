//! # 浮动操作按钮状态机
//!
//! 划词浮动按钮只有两个状态：`Hidden` 与 `Visible`。
//!
//! ```text
//! Hidden ──(可查询的划词)──▶ Visible ──(超时 / 关闭 / 不可查询的划词 / 点击操作)──▶ Hidden
//!                              │
//!                              └──(新的可查询划词)──▶ Visible（重新开始计时）
//! ```
//!
//! 状态转换是纯函数：`FloatingControl::transition` 接收事件，返回新状态和需要执行的副作用
//! （取消/安排计时器、清除 DOM 选区、发起查询），不依赖任何事件绑定机制，可脱离 DOM 测试。
//! 每次进入 `Visible` 都会递增 generation，超时事件必须携带匹配的 generation 才会生效，
//! 因此被新划词取代的旧计时器即使触发也不会隐藏新按钮。
//!
//! `SelectionSlot` 是运行时外壳：持有唯一的状态槽和 `HideTimer`，负责执行副作用。

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;

use crate::models::selection::{
    FloatingAction, LookupRequest, SelectionSnapshot, SelectionState, Viewport,
};
use crate::models::settings::AnnotatorConfig;
use crate::services::classifier::{self, SelectionKind};
use crate::services::context;
use crate::services::hide_timer::HideTimer;
use crate::services::positioner::{self, ControlMetrics};

/// 浮动按钮状态
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", content = "selection", rename_all = "lowercase")]
pub enum ControlState {
    #[default]
    Hidden,
    Visible(SelectionState),
}

/// 驱动状态机的事件
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// 消息列表上的 `mouseup`
    Selection {
        snapshot: SelectionSnapshot,
        viewport: Viewport,
        now_ms: u64,
    },
    /// 自动隐藏计时器触发
    Timeout { generation: u64 },
    /// 截止时间轮询（没有计时器的宿主使用）
    Tick { now_ms: u64 },
    /// 用户主动关闭
    Dismiss,
    /// 点击浮动按钮上的操作
    Action(FloatingAction),
}

/// 状态转换产生的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CancelHide,
    ScheduleHide { generation: u64, after: Duration },
    /// 清除 DOM 选区，避免高亮残留
    ClearDomSelection,
    /// 把选中文本和上下文交给查询协作者
    Lookup(LookupRequest),
}

/// 浮动按钮状态机
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloatingControl {
    state: ControlState,
    generation: u64,
}

impl FloatingControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, ControlState::Visible(_))
    }

    fn hidden(self) -> Self {
        Self {
            state: ControlState::Hidden,
            generation: self.generation,
        }
    }

    /// 状态转换
    ///
    /// # 参数
    /// - `event` - 输入事件
    /// - `config` - 标注配置（上下文半径、按钮尺寸、自动隐藏时长）
    ///
    /// # 返回值
    /// `(新状态, 副作用列表)`，副作用按列表顺序执行
    pub fn transition(self, event: ControlEvent, config: &AnnotatorConfig) -> (Self, Vec<Effect>) {
        match event {
            ControlEvent::Selection {
                snapshot,
                viewport,
                now_ms,
            } => self.on_selection(&snapshot, &viewport, now_ms, config),

            ControlEvent::Timeout { generation } => {
                if self.is_visible() && generation == self.generation {
                    log::debug!("浮动按钮自动隐藏 (generation {})", generation);
                    (self.hidden(), vec![])
                } else {
                    (self, vec![])
                }
            }

            ControlEvent::Tick { now_ms } => match &self.state {
                ControlState::Visible(sel) if now_ms >= sel.expires_at => {
                    (self.hidden(), vec![Effect::CancelHide])
                }
                _ => (self, vec![]),
            },

            ControlEvent::Dismiss => (self.hidden(), vec![Effect::CancelHide]),

            ControlEvent::Action(action) => self.on_action(action),
        }
    }

    fn on_selection(
        self,
        snapshot: &SelectionSnapshot,
        viewport: &Viewport,
        now_ms: u64,
        config: &AnnotatorConfig,
    ) -> (Self, Vec<Effect>) {
        let Some(extracted) = context::extract(snapshot, config.context_radius) else {
            return (self.hidden(), vec![Effect::CancelHide]);
        };

        let anchor = positioner::position(
            &snapshot.rect,
            viewport,
            &ControlMetrics::from_config(config),
        );
        let generation = self.generation + 1;
        let single_word =
            classifier::classify(&extracted.selected_text) == SelectionKind::SingleWord;
        log::debug!(
            "划词命中: {:?} (单词: {}, generation {})",
            extracted.selected_text,
            single_word,
            generation
        );

        let state = SelectionState {
            selected_text: extracted.selected_text,
            context_window: extracted.context_window,
            anchor_point: anchor.point,
            indicator: anchor.indicator,
            visible: true,
            expires_at: now_ms.saturating_add(config.auto_hide_ms),
            single_word,
        };

        (
            Self {
                state: ControlState::Visible(state),
                generation,
            },
            vec![
                Effect::CancelHide,
                Effect::ScheduleHide {
                    generation,
                    after: config.auto_hide(),
                },
            ],
        )
    }

    fn on_action(self, action: FloatingAction) -> (Self, Vec<Effect>) {
        let ControlState::Visible(sel) = &self.state else {
            return (self, vec![]);
        };
        // 快速查询仅对单个单词开放
        if action == FloatingAction::QuickLookup && !sel.single_word {
            return (self, vec![]);
        }

        let request = LookupRequest {
            selected_text: sel.selected_text.clone(),
            context_window: sel.context_window.clone(),
            quick: action == FloatingAction::QuickLookup,
        };
        (
            self.hidden(),
            vec![
                Effect::CancelHide,
                Effect::ClearDomSelection,
                Effect::Lookup(request),
            ],
        )
    }
}

/// 一次事件派发的对外结果
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub state: ControlState,
    pub clear_dom_selection: bool,
    pub lookup: Option<LookupRequest>,
}

/// 浮动按钮隐藏时的通知回调
pub type HiddenCallback = Arc<dyn Fn() + Send + Sync>;

/// 唯一的划词状态槽
///
/// 浏览器中同一时刻只有一个选区，因此只需"后写者胜 + 取消旧计时器"，
/// 不需要更复杂的同步策略。
#[derive(Default)]
pub struct SelectionSlot {
    control: Mutex<FloatingControl>,
    timer: HideTimer,
}

impl SelectionSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 当前状态快照
    pub fn current(&self) -> FloatingControl {
        self.control
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// 派发事件并执行副作用
    ///
    /// # 参数
    /// - `event` - 输入事件
    /// - `config` - 标注配置
    /// - `on_hidden` - 计时器触发导致按钮隐藏时的通知（如向前端发送事件）
    pub fn dispatch(
        self: &Arc<Self>,
        event: ControlEvent,
        config: &AnnotatorConfig,
        on_hidden: HiddenCallback,
    ) -> DispatchOutcome {
        let (state, effects) = {
            let Ok(mut control) = self.control.lock() else {
                log::warn!("划词状态锁已损坏，忽略事件");
                return DispatchOutcome::default();
            };
            let (next, effects) = std::mem::take(&mut *control).transition(event, config);
            *control = next;
            (control.state().clone(), effects)
        };

        let mut outcome = DispatchOutcome {
            state,
            ..Default::default()
        };
        for effect in effects {
            match effect {
                Effect::CancelHide => self.timer.cancel(),
                Effect::ScheduleHide { generation, after } => {
                    let slot = Arc::downgrade(self);
                    let config = config.clone();
                    let on_hidden = on_hidden.clone();
                    self.timer.schedule(after, move || {
                        let Some(slot) = slot.upgrade() else {
                            return;
                        };
                        if slot.expire(generation, &config) {
                            on_hidden();
                        }
                    });
                }
                Effect::ClearDomSelection => outcome.clear_dom_selection = true,
                Effect::Lookup(request) => outcome.lookup = Some(request),
            }
        }
        outcome
    }

    /// 计时器回调：generation 匹配时隐藏，返回是否真的发生了隐藏
    fn expire(&self, generation: u64, config: &AnnotatorConfig) -> bool {
        let Ok(mut control) = self.control.lock() else {
            return false;
        };
        let was_visible = control.is_visible();
        let (next, _) =
            std::mem::take(&mut *control).transition(ControlEvent::Timeout { generation }, config);
        *control = next;
        was_visible && !control.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::selection::{IndicatorPlacement, Rect};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VIEWPORT: Viewport = Viewport {
        width: 1024.0,
        height: 768.0,
    };

    fn selection(text: &str, now_ms: u64) -> ControlEvent {
        ControlEvent::Selection {
            snapshot: SelectionSnapshot {
                text: text.to_string(),
                container_text: Some(format!("Today I learned that {} is useful.", text)),
                rect: Rect::new(300.0, 200.0, 60.0, 18.0),
            },
            viewport: VIEWPORT,
            now_ms,
        }
    }

    fn visible(control: &FloatingControl) -> &SelectionState {
        match control.state() {
            ControlState::Visible(sel) => sel,
            ControlState::Hidden => panic!("expected visible control"),
        }
    }

    #[test]
    fn test_queryable_selection_shows_control() {
        let config = AnnotatorConfig::default();
        let (control, effects) =
            FloatingControl::new().transition(selection("serendipity", 1_000), &config);

        let sel = visible(&control);
        assert_eq!(sel.selected_text, "serendipity");
        assert!(sel.context_window.contains("serendipity"));
        assert!(sel.single_word);
        assert!(sel.visible);
        assert_eq!(sel.expires_at, 9_000);
        assert_eq!(sel.indicator, IndicatorPlacement::Below);
        assert_eq!(
            effects,
            vec![
                Effect::CancelHide,
                Effect::ScheduleHide {
                    generation: 1,
                    after: Duration::from_millis(8000)
                }
            ]
        );
    }

    #[test]
    fn test_disqualifying_selection_hides() {
        let config = AnnotatorConfig::default();
        let (control, _) = FloatingControl::new().transition(selection("apple", 0), &config);
        let (control, effects) = control.transition(selection("苹果", 10), &config);
        assert!(!control.is_visible());
        assert_eq!(effects, vec![Effect::CancelHide]);
    }

    #[test]
    fn test_stale_timeout_is_ignored() {
        let config = AnnotatorConfig::default();
        let (control, _) = FloatingControl::new().transition(selection("apple", 0), &config);
        let (control, _) = control.transition(selection("banana split", 100), &config);
        assert_eq!(control.generation(), 2);

        let (control, _) = control.transition(ControlEvent::Timeout { generation: 1 }, &config);
        assert!(control.is_visible());

        let (control, _) = control.transition(ControlEvent::Timeout { generation: 2 }, &config);
        assert!(!control.is_visible());
    }

    #[test]
    fn test_tick_hides_after_deadline() {
        let config = AnnotatorConfig {
            auto_hide_ms: 3000,
            ..Default::default()
        };
        let (control, _) = FloatingControl::new().transition(selection("apple", 500), &config);
        let (control, _) = control.transition(ControlEvent::Tick { now_ms: 3_499 }, &config);
        assert!(control.is_visible());
        let (control, _) = control.transition(ControlEvent::Tick { now_ms: 3_500 }, &config);
        assert!(!control.is_visible());
    }

    #[test]
    fn test_action_hands_off_and_clears_selection() {
        let config = AnnotatorConfig::default();
        let (control, _) = FloatingControl::new().transition(selection("apple", 0), &config);
        let (control, effects) =
            control.transition(ControlEvent::Action(FloatingAction::QuickLookup), &config);
        assert!(!control.is_visible());
        assert_eq!(effects[0], Effect::CancelHide);
        assert_eq!(effects[1], Effect::ClearDomSelection);
        match &effects[2] {
            Effect::Lookup(req) => {
                assert_eq!(req.selected_text, "apple");
                assert!(req.quick);
            }
            other => panic!("unexpected effect {:?}", other),
        }
    }

    #[test]
    fn test_quick_lookup_unavailable_for_phrase() {
        let config = AnnotatorConfig::default();
        let (control, _) = FloatingControl::new().transition(selection("green apple", 0), &config);
        let (control, effects) =
            control.transition(ControlEvent::Action(FloatingAction::QuickLookup), &config);
        assert!(control.is_visible());
        assert!(effects.is_empty());

        let (control, effects) =
            control.transition(ControlEvent::Action(FloatingAction::Analyze), &config);
        assert!(!control.is_visible());
        assert_eq!(effects.len(), 3);
    }

    #[test]
    fn test_dismiss_and_action_when_hidden() {
        let config = AnnotatorConfig::default();
        let (control, effects) = FloatingControl::new().transition(ControlEvent::Dismiss, &config);
        assert!(!control.is_visible());
        assert_eq!(effects, vec![Effect::CancelHide]);

        let (_, effects) =
            control.transition(ControlEvent::Action(FloatingAction::Analyze), &config);
        assert!(effects.is_empty());
    }

    fn hidden_counter() -> (Arc<AtomicUsize>, HiddenCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        let callback: HiddenCallback = Arc::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_auto_hides_once() {
        let config = AnnotatorConfig::default();
        let slot = SelectionSlot::new();
        let (hidden, on_hidden) = hidden_counter();

        let outcome = slot.dispatch(selection("apple", 0), &config, on_hidden.clone());
        assert!(matches!(outcome.state, ControlState::Visible(_)));

        tokio::time::sleep(Duration::from_millis(8_100)).await;
        assert!(!slot.current().is_visible());
        assert_eq!(hidden.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_new_selection_restarts_timer() {
        let config = AnnotatorConfig::default();
        let slot = SelectionSlot::new();
        let (hidden, on_hidden) = hidden_counter();

        slot.dispatch(selection("apple", 0), &config, on_hidden.clone());
        tokio::time::sleep(Duration::from_secs(6)).await;
        slot.dispatch(selection("banana", 6_000), &config, on_hidden.clone());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(slot.current().is_visible());
        assert_eq!(hidden.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!slot.current().is_visible());
        assert_eq!(hidden.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slot_action_cancels_timer() {
        let config = AnnotatorConfig::default();
        let slot = SelectionSlot::new();
        let (hidden, on_hidden) = hidden_counter();

        slot.dispatch(selection("apple", 0), &config, on_hidden.clone());
        let outcome = slot.dispatch(
            ControlEvent::Action(FloatingAction::Analyze),
            &config,
            on_hidden.clone(),
        );
        assert!(outcome.clear_dom_selection);
        assert_eq!(outcome.lookup.map(|r| r.quick), Some(false));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(hidden.load(Ordering::SeqCst), 0);
    }
}
