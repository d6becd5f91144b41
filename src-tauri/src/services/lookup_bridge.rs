//! # 查询请求桥
//!
//! 查询对话框的网络调用由前端的聊天客户端完成。桥接方式：
//! 1. `PendingLookups::lookup` 分配请求 ID，登记一个 oneshot 通道，通过 sink 把请求发给前端
//! 2. 前端完成调用后以同一个 ID 调用 `resolve`，结果经通道交回等待中的查询流程
//!
//! 超时或 sink 发送失败时等待方得到 `Err`，由 `LookupFlow` 转成对话框内的错误提示。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::services::lookup::{LookupCollaborator, LookupFuture};

/// 前端未响应时的等待上限
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// 发给前端的查询请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupDispatch {
    pub request_id: u64,
    pub word: String,
    pub context: String,
    pub hints: Vec<String>,
}

/// 把查询请求送到前端的出口（桌面端为 Tauri 事件）
pub type DispatchSink = Arc<dyn Fn(LookupDispatch) -> Result<(), String> + Send + Sync>;

type Responder = oneshot::Sender<Result<Value, String>>;

/// 等待前端响应的查询请求表
pub struct PendingLookups {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, Responder>>,
    sink: DispatchSink,
    timeout: Duration,
}

impl PendingLookups {
    pub fn new(sink: DispatchSink) -> Self {
        Self::with_timeout(sink, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(sink: DispatchSink, timeout: Duration) -> Self {
        Self {
            next_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            sink,
            timeout,
        }
    }

    /// 交回前端的查询结果
    ///
    /// # 返回值
    /// 请求仍在等待时返回 `true`；已超时或 ID 未知时返回 `false`
    pub fn resolve(&self, request_id: u64, result: Result<Value, String>) -> bool {
        let Some(responder) = self.take(request_id) else {
            log::debug!("查询请求 {} 已不在等待中", request_id);
            return false;
        };
        responder.send(result).is_ok()
    }

    /// 仍在等待响应的请求数
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    fn take(&self, request_id: u64) -> Option<Responder> {
        self.pending.lock().ok()?.remove(&request_id)
    }
}

impl LookupCollaborator for PendingLookups {
    fn lookup<'a>(
        &'a self,
        word: &'a str,
        context: &'a str,
        hints: &'a [String],
    ) -> LookupFuture<'a> {
        Box::pin(async move {
            let request_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let (tx, rx) = oneshot::channel();
            self.pending
                .lock()
                .map_err(|e| format!("查询请求表锁已损坏: {}", e))?
                .insert(request_id, tx);

            let dispatch = LookupDispatch {
                request_id,
                word: word.to_string(),
                context: context.to_string(),
                hints: hints.to_vec(),
            };
            if let Err(e) = (self.sink)(dispatch) {
                self.take(request_id);
                return Err(format!("发送查询请求失败: {}", e));
            }

            match tokio::time::timeout(self.timeout, rx).await {
                Ok(Ok(result)) => result,
                Ok(Err(_)) => Err("查询请求已被丢弃".to_string()),
                Err(_) => {
                    self.take(request_id);
                    Err(format!("查询请求 {} 超时", request_id))
                }
            }
        })
    }
}
