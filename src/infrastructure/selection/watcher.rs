//! Selection Watcher
//!
//! 把选区变化通知桥接到播放状态：每次通知都重新读取当前选区，
//! 去除首尾空白后交给状态持有者。挂载时注册监听器，卸载时注销。

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::application::ports::SelectionSourcePort;
use crate::infrastructure::memory::PlaybackStateHolder;

/// 选区监听器
///
/// 被丢弃时同样会注销监听
pub struct SelectionWatcher {
    task: Option<JoinHandle<()>>,
}

impl SelectionWatcher {
    /// 挂载监听器（需在 tokio 运行时内调用）
    pub fn mount(source: Arc<dyn SelectionSourcePort>, holder: PlaybackStateHolder) -> Self {
        // 在返回前完成注册，挂载之后的通知不会丢失
        let mut notifications = source.subscribe();

        let task = tokio::spawn(async move {
            tracing::debug!("SelectionWatcher mounted");
            loop {
                match notifications.recv().await {
                    // 丢失的通知无需补发：总是读取最新选区
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        let text = current_trimmed(source.as_ref());
                        if let Err(e) = holder.set_selected_text(text).await {
                            tracing::warn!(error = %e, "Failed to forward selection");
                            break;
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("SelectionWatcher loop exited");
        });

        Self { task: Some(task) }
    }

    /// 卸载监听器，返回时监听已注销
    pub async fn unmount(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
        tracing::debug!("SelectionWatcher unmounted");
    }
}

impl Drop for SelectionWatcher {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// 读取当前选区；没有选区对象时视为空字符串
fn current_trimmed(source: &dyn SelectionSourcePort) -> String {
    source
        .current_selection()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}
