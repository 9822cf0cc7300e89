//! Playback Controller Handle
//!
//! 播放控制入口：play / pause / resume / stop / seek / 朗读设置

use std::sync::Arc;

use super::playback_worker::{CommandResult, ControllerMailbox};
use crate::application::ports::SpeechSynthesizerPort;
use crate::application::PlaybackCommand;
use crate::domain::playback::SettingsUpdate;

/// 播放控制器句柄
///
/// 可克隆；所有操作都投递到控制器邮箱，由控制器任务串行处理
#[derive(Clone)]
pub struct PlaybackController {
    mailbox: ControllerMailbox,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
}

impl PlaybackController {
    pub fn new(mailbox: ControllerMailbox, synthesizer: Arc<dyn SpeechSynthesizerPort>) -> Self {
        Self {
            mailbox,
            synthesizer,
        }
    }

    pub async fn play(&self) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::Play).await
    }

    pub async fn pause(&self) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::Pause).await
    }

    pub async fn resume(&self) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::Resume).await
    }

    pub async fn stop(&self) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::Stop).await
    }

    pub async fn seek(&self, unit_index: usize) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::Seek(unit_index)).await
    }

    /// 局部更新在控制器任务内合并，并发更新互不覆盖
    pub async fn update_settings(&self, update: SettingsUpdate) -> CommandResult {
        self.mailbox
            .dispatch(PlaybackCommand::UpdateSettings(update))
            .await
    }

    /// 合成引擎是否可用
    pub async fn engine_healthy(&self) -> bool {
        self.synthesizer.health_check().await
    }

    pub(crate) fn mailbox(&self) -> &ControllerMailbox {
        &self.mailbox
    }
}
