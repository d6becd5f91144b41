//! # 划词查询流程
//!
//! 浮动按钮点击后打开的查询对话框状态：
//! - **快速查询**：单词直接查询，跳过生词选择
//! - **句子解析**：先从选中文本中提取候选生词，用户勾选不认识的词后再请求解析
//!
//! 查询本身由外部协作者（`LookupCollaborator`）完成，结果是不透明的 JSON，原样交给前端。
//! 协作者失败时不向上传播错误，而是把 `{"error": "..."}` 作为结果展示在对话框内。

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Value, json};

use crate::models::selection::LookupRequest;
use crate::services::floating::DispatchOutcome;

/// 候选生词上限
const MAX_VOCABULARY: usize = 20;

const QUICK_QUERY_FAILED: &str = "查询失败，请稍后再试";
const ANALYZE_FAILED: &str = "解析失败，请稍后再试";

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+(?:[-'][a-zA-Z]+)*").unwrap());

/// 不作为候选生词的常见功能词
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "can", "must", "shall",
];

/// 协作者返回的 Future
pub type LookupFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, String>> + Send + 'a>>;

/// 外部查询协作者
///
/// # 参数
/// - `word` - 选中文本
/// - `context` - 上下文窗口
/// - `hints` - 词汇提示（快速查询时为选中文本本身，句子解析时为勾选的生词）
pub trait LookupCollaborator: Send + Sync {
    fn lookup<'a>(&'a self, word: &'a str, context: &'a str, hints: &'a [String])
    -> LookupFuture<'a>;
}

/// 从文本中提取候选生词
///
/// 按首次出现顺序去重，排除单字母词和功能词（忽略大小写），最多保留 20 个。
pub fn extract_vocabulary(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|word| word.len() > 1)
        .filter(|word| !STOP_WORDS.contains(&word.to_lowercase().as_str()))
        .filter(|word| seen.insert(*word))
        .take(MAX_VOCABULARY)
        .map(str::to_string)
        .collect()
}

/// 对话框所处步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupStep {
    VocabSelection,
    Analysis,
}

/// 查询对话框状态
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupFlow {
    request: LookupRequest,
    step: LookupStep,
    vocabulary: Vec<String>,
    selected_vocab: Vec<String>,
    result: Option<Value>,
}

impl LookupFlow {
    /// 打开对话框
    pub fn open(request: LookupRequest) -> Self {
        let vocabulary = extract_vocabulary(&request.selected_text);
        Self {
            request,
            step: LookupStep::VocabSelection,
            vocabulary,
            selected_vocab: Vec::new(),
            result: None,
        }
    }

    pub fn request(&self) -> &LookupRequest {
        &self.request
    }

    pub fn step(&self) -> LookupStep {
        self.step
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn selected_vocab(&self) -> &[String] {
        &self.selected_vocab
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// 勾选/取消勾选一个生词
    pub fn toggle_vocab(&mut self, word: &str) {
        if let Some(pos) = self.selected_vocab.iter().position(|w| w == word) {
            self.selected_vocab.remove(pos);
        } else {
            self.selected_vocab.push(word.to_string());
        }
    }

    /// 快速查询单词
    ///
    /// # 返回值
    /// - `Ok(result)` - 查询结果；协作者失败时为 `{"error": ...}`
    /// - `Err` - 选中文本为空
    pub async fn quick_query(&mut self, collab: &dyn LookupCollaborator) -> Result<Value, String> {
        let word = self.request.selected_text.trim().to_string();
        if word.is_empty() {
            return Err("没有可查询的内容".to_string());
        }

        let hints = vec![word.clone()];
        let result = match collab
            .lookup(&word, &self.request.context_window, &hints)
            .await
        {
            Ok(value) => value,
            Err(e) => {
                log::warn!("快速查询失败 [{}]: {}", word, e);
                json!({ "error": QUICK_QUERY_FAILED })
            }
        };
        Ok(self.finish(result))
    }

    /// 按勾选的生词解析句子
    ///
    /// # 返回值
    /// - `Ok(result)` - 解析结果；协作者失败时为 `{"error": ...}`
    /// - `Err` - 没有勾选任何生词
    pub async fn analyze(&mut self, collab: &dyn LookupCollaborator) -> Result<Value, String> {
        if self.selected_vocab.is_empty() {
            return Err("请至少选择一个不认识的生词".to_string());
        }

        let result = match collab
            .lookup(
                &self.request.selected_text,
                &self.request.context_window,
                &self.selected_vocab,
            )
            .await
        {
            Ok(value) => value,
            Err(e) => {
                log::warn!("句子解析失败: {}", e);
                json!({ "error": ANALYZE_FAILED })
            }
        };
        Ok(self.finish(result))
    }

    /// 返回生词选择步骤，清空上一次结果
    pub fn reset_to_selection(&mut self) {
        self.step = LookupStep::VocabSelection;
        self.result = None;
    }

    fn finish(&mut self, result: Value) -> Value {
        self.step = LookupStep::Analysis;
        self.result = Some(result.clone());
        result
    }
}

/// 当前打开的查询对话框
///
/// 同一时刻只有一个对话框；浮动按钮的新操作会替换旧对话框。
/// 使用 `tokio::sync::Mutex`，查询协作者等待期间持有锁，避免同一对话框并发提交。
#[derive(Default)]
pub struct LookupSession {
    flow: tokio::sync::Mutex<Option<LookupFlow>>,
}

impl LookupSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开新的对话框，返回初始状态
    pub async fn open(&self, request: LookupRequest) -> LookupFlow {
        let flow = LookupFlow::open(request);
        *self.flow.lock().await = Some(flow.clone());
        flow
    }

    /// 浮动按钮操作产生了查询请求时打开对话框
    pub async fn open_from(&self, outcome: &DispatchOutcome) -> Option<LookupFlow> {
        match &outcome.lookup {
            Some(request) => Some(self.open(request.clone()).await),
            None => None,
        }
    }

    pub async fn current(&self) -> Option<LookupFlow> {
        self.flow.lock().await.clone()
    }

    pub async fn close(&self) {
        *self.flow.lock().await = None;
    }

    pub async fn toggle_vocab(&self, word: &str) -> Result<LookupFlow, String> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_open)?;
        flow.toggle_vocab(word);
        Ok(flow.clone())
    }

    pub async fn quick_query(
        &self,
        collab: &dyn LookupCollaborator,
    ) -> Result<LookupFlow, String> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_open)?;
        flow.quick_query(collab).await?;
        Ok(flow.clone())
    }

    pub async fn analyze(
        &self,
        collab: &dyn LookupCollaborator,
    ) -> Result<LookupFlow, String> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_open)?;
        flow.analyze(collab).await?;
        Ok(flow.clone())
    }

    pub async fn reset_to_selection(&self) -> Result<LookupFlow, String> {
        let mut guard = self.flow.lock().await;
        let flow = guard.as_mut().ok_or_else(not_open)?;
        flow.reset_to_selection();
        Ok(flow.clone())
    }
}

fn not_open() -> String {
    "查询对话框未打开".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录调用参数的模拟协作者
    #[derive(Default)]
    struct MockCollaborator {
        fail: bool,
        calls: Mutex<Vec<(String, String, Vec<String>)>>,
    }

    impl LookupCollaborator for MockCollaborator {
        fn lookup<'a>(
            &'a self,
            word: &'a str,
            context: &'a str,
            hints: &'a [String],
        ) -> LookupFuture<'a> {
            Box::pin(async move {
                self.calls
                    .lock()
                    .unwrap()
                    .push((word.to_string(), context.to_string(), hints.to_vec()));
                if self.fail {
                    Err("network down".to_string())
                } else {
                    Ok(json!({ "word": word, "hints": hints }))
                }
            })
        }
    }

    fn request(text: &str, quick: bool) -> LookupRequest {
        LookupRequest {
            selected_text: text.to_string(),
            context_window: "some context".to_string(),
            quick,
        }
    }

    #[test]
    fn test_extract_vocabulary_filters_and_dedupes() {
        let words =
            extract_vocabulary("The cat's well-known habit is to nap, and the cat naps a lot.");
        assert_eq!(
            words,
            vec!["cat's", "well-known", "habit", "nap", "cat", "naps", "lot"]
        );
    }

    #[test]
    fn test_extract_vocabulary_caps_at_twenty() {
        let text: Vec<String> = (1..=30).map(|i| format!("w{}", "o".repeat(i))).collect();
        let words = extract_vocabulary(&text.join(" "));
        assert_eq!(words.len(), 20);
        assert_eq!(words[0], "wo");
    }

    #[test]
    fn test_toggle_vocab() {
        let mut flow = LookupFlow::open(request("serendipity matters", false));
        assert_eq!(flow.step(), LookupStep::VocabSelection);
        assert_eq!(flow.vocabulary(), ["serendipity", "matters"]);

        flow.toggle_vocab("serendipity");
        flow.toggle_vocab("matters");
        flow.toggle_vocab("serendipity");
        assert_eq!(flow.selected_vocab(), ["matters"]);
    }

    #[tokio::test]
    async fn test_quick_query_passes_trimmed_hint() {
        let collab = MockCollaborator::default();
        let mut flow = LookupFlow::open(request("  ephemeral ", true));

        let result = flow.quick_query(&collab).await.unwrap();
        assert_eq!(result["word"], "ephemeral");
        assert_eq!(flow.step(), LookupStep::Analysis);

        let calls = collab.calls.lock().unwrap();
        assert_eq!(calls[0].1, "some context");
        assert_eq!(calls[0].2, vec!["ephemeral".to_string()]);
    }

    #[tokio::test]
    async fn test_quick_query_failure_becomes_inline_error() {
        let collab = MockCollaborator {
            fail: true,
            ..Default::default()
        };
        let mut flow = LookupFlow::open(request("ephemeral", true));
        let result = flow.quick_query(&collab).await.unwrap();
        assert_eq!(result, json!({ "error": "查询失败，请稍后再试" }));
        assert_eq!(flow.result(), Some(&result));
    }

    #[tokio::test]
    async fn test_analyze_requires_selected_vocab() {
        let collab = MockCollaborator::default();
        let mut flow = LookupFlow::open(request("A rather obscure sentence.", false));

        let err = flow.analyze(&collab).await.unwrap_err();
        assert_eq!(err, "请至少选择一个不认识的生词");
        assert!(collab.calls.lock().unwrap().is_empty());

        flow.toggle_vocab("obscure");
        let result = flow.analyze(&collab).await.unwrap();
        assert_eq!(result["hints"], json!(["obscure"]));

        flow.reset_to_selection();
        assert_eq!(flow.step(), LookupStep::VocabSelection);
        assert!(flow.result().is_none());
        assert_eq!(flow.selected_vocab(), ["obscure"]);
    }

    #[tokio::test]
    async fn test_analyze_failure_becomes_inline_error() {
        let collab = MockCollaborator {
            fail: true,
            ..Default::default()
        };
        let mut flow = LookupFlow::open(request("obscure words", false));
        flow.toggle_vocab("obscure");
        let result = flow.analyze(&collab).await.unwrap();
        assert_eq!(result["error"], "解析失败，请稍后再试");
    }

    #[tokio::test]
    async fn test_session_requires_open_dialog() {
        let session = LookupSession::new();
        let collab = MockCollaborator::default();
        assert_eq!(session.toggle_vocab("x").await.unwrap_err(), "查询对话框未打开");
        assert!(session.quick_query(&collab).await.is_err());

        session.open(request("obscure words", false)).await;
        session.toggle_vocab("obscure").await.unwrap();
        let flow = session.analyze(&collab).await.unwrap();
        assert_eq!(flow.step(), LookupStep::Analysis);

        let flow = session.reset_to_selection().await.unwrap();
        assert!(flow.result().is_none());

        session.close().await;
        assert!(session.current().await.is_none());
    }

    #[tokio::test]
    async fn test_open_from_outcome_without_request() {
        let session = LookupSession::new();
        assert!(session.open_from(&DispatchOutcome::default()).await.is_none());
        assert!(session.current().await.is_none());
    }
}
