//! Selection Source Port - 文本选区来源
//!
//! 选区变化通知不携带任何可信内容，订阅方收到通知后必须重新读取当前选区

use tokio::sync::broadcast;

/// 选区可能已变化的通知
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChanged;

/// Selection Source Port
pub trait SelectionSourcePort: Send + Sync {
    /// 读取当前选区，没有选区对象时返回 None
    fn current_selection(&self) -> Option<String>;

    /// 注册一个选区变化监听器，Receiver 被丢弃即视为注销
    fn subscribe(&self) -> broadcast::Receiver<SelectionChanged>;
}
