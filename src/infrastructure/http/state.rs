//! Application State
//!
//! HTTP 处理器共享的应用状态

use std::sync::Arc;

use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::mount::GlobalControllerMount;
use crate::infrastructure::selection::InMemorySelectionSource;

/// 应用状态
///
/// 所有播放控制都经由全局挂载点；选区上报写入选区来源，由监听器转交状态持有者
pub struct AppState {
    pub mount: GlobalControllerMount,
    pub selection_source: Arc<InMemorySelectionSource>,
    pub event_publisher: Arc<EventPublisher>,
}

impl AppState {
    pub fn new(
        mount: GlobalControllerMount,
        selection_source: Arc<InMemorySelectionSource>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        Self {
            mount,
            selection_source,
            event_publisher,
        }
    }
}
