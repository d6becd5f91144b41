//! # 自动隐藏计时器
//!
//! 浮动按钮的自动隐藏是核心唯一持有的定时任务。约束：
//! - 任意时刻最多只有一个待触发的隐藏任务
//! - 安排新任务前先取消旧任务，避免过期计时器把新的浮动按钮隐藏掉
//! - 取消操作幂等：对已触发或已取消的任务再次取消不会出错
//!
//! 任务通过 tokio 运行时调度，取消即 `JoinHandle::abort()`。

use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// 可取消的单槽延时任务
#[derive(Default)]
pub struct HideTimer {
    /// 当前待触发任务的句柄
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl HideTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安排一次延时回调，先取消尚未触发的旧任务
    ///
    /// 必须在 tokio 运行时上下文中调用；没有运行时时只记录警告，
    /// 此时调用方仍可依靠 `SelectionState::expires_at` 截止时间轮询隐藏。
    ///
    /// # 参数
    /// - `delay` - 延时时长
    /// - `on_fire` - 到时执行的回调
    pub fn schedule<F>(&self, delay: Duration, on_fire: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let Ok(mut pending) = self.pending.lock() else {
            log::warn!("自动隐藏计时器锁已损坏，跳过本次调度");
            return;
        };
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("当前线程没有 tokio 运行时，无法安排自动隐藏: {}", e);
                return;
            }
        };

        log::debug!("安排自动隐藏: {} ms 后触发", delay.as_millis());
        *pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire();
        }));
    }

    /// 取消待触发的任务（幂等）
    pub fn cancel(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.abort();
                log::debug!("已取消待触发的自动隐藏");
            }
        }
    }

    /// 是否还有尚未完成的任务
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|pending| pending.as_ref().is_some_and(|h| !h.is_finished()))
            .unwrap_or(false)
    }
}

impl Drop for HideTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let timer = HideTimer::new();
        let (count, on_fire) = counter();
        timer.schedule(Duration::from_secs(8), on_fire);
        assert!(timer.is_pending());

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_cancels_previous() {
        let timer = HideTimer::new();
        let (first, on_first) = counter();
        let (second, on_second) = counter();

        timer.schedule(Duration::from_secs(8), on_first);
        tokio::time::sleep(Duration::from_secs(5)).await;
        timer.schedule(Duration::from_secs(8), on_second);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let timer = HideTimer::new();
        timer.cancel();

        let (count, on_fire) = counter();
        timer.schedule(Duration::from_secs(3), on_fire);
        timer.cancel();
        timer.cancel();

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        timer.cancel();
    }

    #[test]
    fn test_schedule_without_runtime_is_noop() {
        let timer = HideTimer::new();
        let (count, on_fire) = counter();
        timer.schedule(Duration::from_millis(1), on_fire);
        assert!(!timer.is_pending());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
