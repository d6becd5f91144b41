//! # 模型回复解析
//!
//! 聊天后端约定模型回复格式为 `英文正文|||中文翻译`。
//! 解析后英文部分作为消息正文，翻译部分挂到 `Message::translation` 上，供分段对齐使用。

use crate::models::message::Message;

/// 正文与翻译之间的分隔符
const TRANSLATION_DELIMITER: &str = "|||";

/// 拆分模型回复
///
/// 按分隔符切分后取前两段作为正文和翻译，两侧分别去除首尾空白；
/// 第二个分隔符之后的内容丢弃，翻译部分为空时视为没有翻译。
///
/// # 返回值
/// `(正文, 可选翻译)`
pub fn parse_reply(raw: &str) -> (String, Option<String>) {
    let mut parts = raw.split(TRANSLATION_DELIMITER);
    let content = parts.next().unwrap_or_default().trim().to_string();
    let translation = parts
        .next()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    (content, translation)
}

impl Message {
    /// 由原始模型回复创建 assistant 消息
    pub fn assistant_from_reply(id: u64, raw: &str) -> Self {
        let (content, translation) = parse_reply(raw);
        Message::assistant(id, content, translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Role;

    #[test]
    fn test_parse_with_translation() {
        let (content, translation) = parse_reply("I like apples. ||| 我喜欢苹果。");
        assert_eq!(content, "I like apples.");
        assert_eq!(translation.as_deref(), Some("我喜欢苹果。"));
    }

    #[test]
    fn test_parse_without_delimiter() {
        let (content, translation) = parse_reply("  Just English.\n");
        assert_eq!(content, "Just English.");
        assert!(translation.is_none());
    }

    #[test]
    fn test_extra_delimiters_are_ignored() {
        let (content, translation) = parse_reply("a|||b|||c");
        assert_eq!(content, "a");
        assert_eq!(translation.as_deref(), Some("b"));
    }

    #[test]
    fn test_empty_translation_is_none() {
        let msg = Message::assistant_from_reply(7, "Hello.|||   ");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hello.");
        assert!(msg.translation.is_none());
    }
}
