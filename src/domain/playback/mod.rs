//! Playback Context - 朗读播放限界上下文
//!
//! 职责:
//! - 播放模式与控制器状态
//! - 播放状态机（会话 ID 防过期回调）
//! - 合成错误与状态指示

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{Effect, PlaybackMachine, PlaybackSnapshot, Transition};
pub use errors::{PlaybackError, StatusIndicator, SynthesisError};
pub use value_objects::{
    ControllerState, PlayMode, PlaybackSessionId, SettingsUpdate, SpeechSettings, MAX_RATE,
    MIN_RATE,
};
