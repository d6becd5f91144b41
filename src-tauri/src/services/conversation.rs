//! # 会话消息集合
//!
//! 持有当前会话的全部消息，负责消息的创建、挂载纠错/翻译、编辑、删除和清空。
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` 包装消息列表。
//! Tauri 的 command 可能在不同线程上并发执行，渲染（读）可以并发，追加与编辑（写）互斥。
//!
//! ## 消息 ID
//! ID 按创建顺序单调递增，清空会话后也不会复用。

use std::sync::RwLock;

use crate::models::message::{CorrectionRecord, Message, OptimizationRecord, Role};

/// 会话消息集合
///
/// 通过 Tauri 的 `manage()` 注册为应用状态，command 通过 `State<Conversation>` 访问。
#[derive(Default)]
pub struct Conversation {
    inner: RwLock<ConversationInner>,
}

#[derive(Default)]
struct ConversationInner {
    messages: Vec<Message>,
    next_id: u64,
}

impl ConversationInner {
    fn push(&mut self, build: impl FnOnce(u64) -> Message) -> Message {
        self.next_id += 1;
        let msg = build(self.next_id);
        self.messages.push(msg.clone());
        msg
    }

    fn find_mut(&mut self, id: u64) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    fn write<T>(&self, f: impl FnOnce(&mut ConversationInner) -> T) -> Result<T, String> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| format!("会话状态锁已损坏: {}", e))?;
        Ok(f(&mut inner))
    }

    /// 追加一条用户消息
    pub fn push_user(&self, content: &str) -> Result<Message, String> {
        self.write(|inner| inner.push(|id| Message::user(id, content)))
    }

    /// 追加一条模型回复，按 `正文|||翻译` 格式解析
    pub fn push_assistant_reply(&self, raw: &str) -> Result<Message, String> {
        self.write(|inner| inner.push(|id| Message::assistant_from_reply(id, raw)))
    }

    /// 追加一条错误提示
    pub fn push_error(&self, content: &str) -> Result<Message, String> {
        self.write(|inner| inner.push(|id| Message::error(id, content)))
    }

    /// 为用户消息挂载纠错记录
    ///
    /// # 返回值
    /// 消息不存在或不是用户消息时返回 `false`
    pub fn attach_corrections(&self, id: u64, record: CorrectionRecord) -> Result<bool, String> {
        self.write(|inner| match inner.find_mut(id) {
            Some(msg) if msg.role == Role::User => {
                msg.corrections = Some(record);
                true
            }
            _ => false,
        })
    }

    /// 为用户消息挂载写作优化记录
    pub fn attach_optimization(
        &self,
        id: u64,
        record: OptimizationRecord,
    ) -> Result<bool, String> {
        self.write(|inner| match inner.find_mut(id) {
            Some(msg) if msg.role == Role::User => {
                msg.optimization = Some(record);
                true
            }
            _ => false,
        })
    }

    /// 为模型回复挂载翻译
    pub fn attach_translation(&self, id: u64, translation: &str) -> Result<bool, String> {
        self.write(|inner| match inner.find_mut(id) {
            Some(msg) if msg.role == Role::Assistant => {
                let translation = translation.trim();
                msg.translation = (!translation.is_empty()).then(|| translation.to_string());
                true
            }
            _ => false,
        })
    }

    /// 编辑用户消息
    ///
    /// 新文本去除首尾空白后为空时拒绝编辑。编辑成功后消息标记为已编辑；
    /// 旧的纠错与优化记录针对的是旧文本，一并清除。
    ///
    /// # 返回值
    /// 是否实际完成了编辑
    pub fn edit_message(&self, id: u64, text: &str) -> Result<bool, String> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.write(|inner| match inner.find_mut(id) {
            Some(msg) if msg.role == Role::User => {
                msg.content = text.to_string();
                msg.is_edited = true;
                msg.corrections = None;
                msg.optimization = None;
                true
            }
            _ => false,
        })
    }

    /// 删除消息
    pub fn delete_message(&self, id: u64) -> Result<bool, String> {
        self.write(|inner| {
            let before = inner.messages.len();
            inner.messages.retain(|m| m.id != id);
            inner.messages.len() != before
        })
    }

    /// 清空会话
    pub fn clear(&self) -> Result<(), String> {
        self.write(|inner| inner.messages.clear())?;
        log::info!("会话已清空");
        Ok(())
    }

    /// 当前消息列表的快照（创建顺序）
    pub fn snapshot(&self) -> Vec<Message> {
        self.inner
            .read()
            .map(|inner| inner.messages.clone())
            .unwrap_or_default()
    }
}
