//! Event Publisher Implementation
//!
//! 播放事件广播（WebSocket 推送的数据源）

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::playback::{ControllerState, PlayMode, PlaybackSessionId, SynthesisError};

/// 默认广播通道容量
const DEFAULT_CAPACITY: usize = 100;

/// 播放事件类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum PlaybackEvent {
    /// 控制器状态变更
    StateChanged {
        from: ControllerState,
        to: ControllerState,
        session_id: PlaybackSessionId,
        unit_index: usize,
    },
    /// 开始朗读一个单元
    UnitStarted {
        session_id: PlaybackSessionId,
        unit_index: usize,
        text: String,
    },
    /// 选中文本变更
    SelectionChanged { text: String, total_units: usize },
    /// 播放模式变更
    ModeChanged { mode: PlayMode },
    /// 临时错误指示
    Error {
        session_id: PlaybackSessionId,
        kind: String,
        message: String,
    },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<PlaybackEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { channel: tx }
    }

    /// 订阅播放事件
    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.channel.subscribe()
    }

    /// 当前订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.channel.receiver_count()
    }

    /// 发布状态变更事件
    pub fn publish_state_changed(
        &self,
        from: ControllerState,
        to: ControllerState,
        session_id: PlaybackSessionId,
        unit_index: usize,
    ) {
        self.publish(PlaybackEvent::StateChanged {
            from,
            to,
            session_id,
            unit_index,
        });
    }

    /// 发布单元开始朗读事件
    pub fn publish_unit_started(&self, session_id: PlaybackSessionId, unit_index: usize, text: &str) {
        self.publish(PlaybackEvent::UnitStarted {
            session_id,
            unit_index,
            text: text.to_string(),
        });
    }

    /// 发布选中文本变更事件
    pub fn publish_selection_changed(&self, text: &str, total_units: usize) {
        self.publish(PlaybackEvent::SelectionChanged {
            text: text.to_string(),
            total_units,
        });
    }

    /// 发布播放模式变更事件
    pub fn publish_mode_changed(&self, mode: PlayMode) {
        self.publish(PlaybackEvent::ModeChanged { mode });
    }

    /// 发布错误指示事件
    pub fn publish_error(&self, session_id: PlaybackSessionId, error: &SynthesisError) {
        self.publish(PlaybackEvent::Error {
            session_id,
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
    }

    fn publish(&self, event: PlaybackEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Failed to publish playback event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_events_in_order() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();

        publisher.publish_mode_changed(PlayMode::Loop);
        publisher.publish_state_changed(
            ControllerState::Idle,
            ControllerState::Playing,
            PlaybackSessionId::new(1),
            0,
        );

        assert_eq!(
            rx.recv().await.unwrap(),
            PlaybackEvent::ModeChanged {
                mode: PlayMode::Loop
            }
        );
        assert!(matches!(
            rx.recv().await.unwrap(),
            PlaybackEvent::StateChanged {
                to: ControllerState::Playing,
                ..
            }
        ));
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = EventPublisher::new();
        publisher.publish_error(
            PlaybackSessionId::new(3),
            &SynthesisError::Unavailable("no voice".to_string()),
        );
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn test_event_json_shape() {
        let event = PlaybackEvent::Error {
            session_id: PlaybackSessionId::new(2),
            kind: "synthesis_unavailable".to_string(),
            message: "boom".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Error");
        assert_eq!(json["data"]["session_id"], 2);
        assert_eq!(json["data"]["kind"], "synthesis_unavailable");
    }
}
