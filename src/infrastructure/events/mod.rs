//! Events Layer - 播放事件广播

mod publisher;

pub use publisher::{EventPublisher, PlaybackEvent};
