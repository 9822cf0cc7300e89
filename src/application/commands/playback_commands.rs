//! Playback Commands - 播放控制命令
//!
//! 所有对播放状态的写操作都以命令形式投递给唯一的写入方（控制器任务）

use crate::domain::playback::{PlayMode, SettingsUpdate};

/// 播放控制命令
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// 采用新的选中文本（调用方已去除首尾空白）
    SelectText(String),
    /// 切换播放模式
    SetMode(PlayMode),
    /// 更新音色/语速（局部）
    UpdateSettings(SettingsUpdate),
    Play,
    Pause,
    Resume,
    Stop,
    /// 跳转到指定单元
    Seek(usize),
}

impl PlaybackCommand {
    /// 命令名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            PlaybackCommand::SelectText(_) => "select_text",
            PlaybackCommand::SetMode(_) => "set_mode",
            PlaybackCommand::UpdateSettings(_) => "update_settings",
            PlaybackCommand::Play => "play",
            PlaybackCommand::Pause => "pause",
            PlaybackCommand::Resume => "resume",
            PlaybackCommand::Stop => "stop",
            PlaybackCommand::Seek(_) => "seek",
        }
    }
}
