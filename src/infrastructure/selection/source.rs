//! In-Memory Selection Source
//!
//! 外部客户端（浏览器/扩展）通过 HTTP 上报选区，这里保存最新选区并广播变化通知

use std::sync::RwLock;
use tokio::sync::broadcast;

use crate::application::ports::{SelectionChanged, SelectionSourcePort};

/// 内存选区来源
pub struct InMemorySelectionSource {
    current: RwLock<Option<String>>,
    notifier: broadcast::Sender<SelectionChanged>,
}

impl InMemorySelectionSource {
    pub fn new() -> Self {
        let (notifier, _) = broadcast::channel(64);
        Self {
            current: RwLock::new(None),
            notifier,
        }
    }

    /// 上报新的选区并通知监听者
    pub fn report(&self, text: impl Into<String>) {
        self.replace(Some(text.into()));
    }

    /// 清除选区对象（之后读取返回 None）
    pub fn clear(&self) {
        self.replace(None);
    }

    /// 当前注册的监听器数量
    pub fn listener_count(&self) -> usize {
        self.notifier.receiver_count()
    }

    fn replace(&self, selection: Option<String>) {
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = selection;

        if self.notifier.send(SelectionChanged).is_err() {
            tracing::trace!("Selection changed with no listeners");
        }
    }
}

impl Default for InMemorySelectionSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionSourcePort for InMemorySelectionSource {
    fn current_selection(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SelectionChanged> {
        self.notifier.subscribe()
    }
}
