//! # 消息数据模型
//!
//! 定义了聊天消息（Message）以及挂载在用户消息上的纠错记录（CorrectionRecord）、
//! 写作优化记录（OptimizationRecord）等 Rust 结构体，
//! 对应前端 TypeScript 中的 `Message`、`GrammarCorrections`、`Optimization` 接口。
//!
//! 纠错与优化记录的字段名沿用聊天后端返回的 snake_case JSON 结构，
//! 消息本身的字段使用 camelCase，与前端状态对象保持一致。

use serde::{Deserialize, Serialize};

/// 消息角色
///
/// 前端历史代码中 AI 回复的类型值为 `"ai"`，反序列化时作为 `assistant` 的别名接受。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 用户输入的消息，可挂载纠错/优化记录，可编辑和删除
    User,
    /// 模型回复，可携带中文翻译
    #[serde(alias = "ai")]
    Assistant,
    /// 发送失败或后端报错时插入的错误提示
    Error,
}

/// 聊天消息
///
/// 由会话集合（`services::conversation::Conversation`）持有。
/// 创建于发送/接收时，之后只允许挂载纠错、翻译或标记为已编辑。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 按创建顺序递增的消息 ID
    pub id: u64,
    /// 消息角色
    #[serde(alias = "type")]
    pub role: Role,
    /// 消息正文（UTF-8，可能包含 Markdown）
    pub content: String,
    /// 中文翻译（仅 assistant 消息）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    /// 语法纠错记录（仅 user 消息）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrections: Option<CorrectionRecord>,
    /// 写作优化记录（仅 user 消息）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationRecord>,
    /// 是否被用户编辑过
    #[serde(default)]
    pub is_edited: bool,
}

impl Message {
    /// 创建一条用户消息
    pub fn user(id: u64, content: impl Into<String>) -> Self {
        Self::with_role(id, Role::User, content.into())
    }

    /// 创建一条 assistant 消息，可携带翻译
    pub fn assistant(id: u64, content: impl Into<String>, translation: Option<String>) -> Self {
        let mut msg = Self::with_role(id, Role::Assistant, content.into());
        msg.translation = translation;
        msg
    }

    /// 创建一条错误提示消息
    pub fn error(id: u64, content: impl Into<String>) -> Self {
        Self::with_role(id, Role::Error, content.into())
    }

    fn with_role(id: u64, role: Role, content: String) -> Self {
        Self {
            id,
            role,
            content,
            translation: None,
            corrections: None,
            optimization: None,
            is_edited: false,
        }
    }
}

/// 纠错类型
///
/// 后端约定的取值为 `grammar` / `spelling` / `translation`，
/// 无法识别的值统一落入 `Other`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionKind {
    Grammar,
    Spelling,
    Translation,
    #[default]
    #[serde(other)]
    Other,
}

impl CorrectionKind {
    /// 纠错类型在面板徽章上显示的中文标签
    pub fn label(self) -> &'static str {
        match self {
            CorrectionKind::Grammar => "语法",
            CorrectionKind::Spelling => "拼写",
            CorrectionKind::Translation => "翻译",
            CorrectionKind::Other => "其他",
        }
    }
}

/// 单条纠错项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CorrectionEntry {
    #[serde(rename = "type", default)]
    pub kind: CorrectionKind,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub corrected: String,
    /// 中文解释
    #[serde(default)]
    pub explanation: String,
}

/// 语法纠错记录
///
/// 对应后端 `grammar_corrections` 字段。句子完全正确时 `corrections` 为空列表，
/// 此时渲染层不展示纠错标签页。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CorrectionRecord {
    #[serde(default)]
    pub original_sentence: String,
    #[serde(default)]
    pub corrected_sentence: String,
    #[serde(default)]
    pub corrections: Vec<CorrectionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_comment: Option<String>,
}

/// 四级写作评分（每项 0–5 分）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ScoringAnalysis {
    #[serde(default)]
    pub clarity: f32,
    #[serde(default)]
    pub coherence: f32,
    #[serde(default)]
    pub accuracy: f32,
    #[serde(default)]
    pub vocabulary: f32,
}

impl ScoringAnalysis {
    /// 评分上限
    pub const MAX_SCORE: f32 = 5.0;

    /// 将各项分数限制在 `[0, MAX_SCORE]` 区间内
    ///
    /// 模型偶尔会给出越界分数（如 6/5），渲染前统一收敛。
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, Self::MAX_SCORE)
            }
        };
        Self {
            clarity: clamp(self.clarity),
            coherence: clamp(self.coherence),
            accuracy: clamp(self.accuracy),
            vocabulary: clamp(self.vocabulary),
        }
    }
}

/// 单条改进建议
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImprovementNote {
    #[serde(default)]
    pub aspect: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub improvement: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// 写作优化记录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OptimizationRecord {
    #[serde(default)]
    pub original_sentence: String,
    #[serde(default)]
    pub optimized_sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_analysis: Option<ScoringAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_score_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_score_range: Option<String>,
    #[serde(default)]
    pub improvements: Vec<ImprovementNote>,
    #[serde(default)]
    pub tips: Vec<String>,
}
