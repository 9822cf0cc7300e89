//! Worker Layer - 播放控制器
//!
//! 实现 PlaybackWorker（状态唯一写入方）及其控制句柄

mod controller;
mod playback_worker;

pub use controller::PlaybackController;
pub use playback_worker::{CommandResult, ControllerMailbox, ControllerMessage, PlaybackWorker};
