//! Global Controller Mount
//!
//! 应用根部唯一的播放控制入口。无论当前在哪个视图，播放都通过这里控制；
//! 自身不修改状态，只读取状态持有者并把控制动作转交给控制器。

use tokio::sync::watch;

use crate::application::error::ApplicationError;
use crate::domain::playback::{PlayMode, PlaybackSnapshot, SettingsUpdate};
use crate::infrastructure::memory::PlaybackStateHolder;
use crate::infrastructure::worker::{CommandResult, PlaybackController};

/// 全局播放控制挂载点
///
/// 每个状态持有者同一时刻只能挂载一次，被丢弃时释放
pub struct GlobalControllerMount {
    holder: PlaybackStateHolder,
    controller: PlaybackController,
}

impl GlobalControllerMount {
    /// 挂载；已存在挂载时返回 `AlreadyMounted`
    pub fn mount(
        holder: PlaybackStateHolder,
        controller: PlaybackController,
    ) -> Result<Self, ApplicationError> {
        if !holder.try_acquire_mount() {
            return Err(ApplicationError::AlreadyMounted);
        }
        tracing::info!("Global playback controller mounted");
        Ok(Self { holder, controller })
    }

    /// 当前播放状态
    pub fn view(&self) -> PlaybackSnapshot {
        self.holder.snapshot()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.holder.subscribe()
    }

    pub fn holder(&self) -> &PlaybackStateHolder {
        &self.holder
    }

    pub async fn play(&self) -> CommandResult {
        self.controller.play().await
    }

    pub async fn pause(&self) -> CommandResult {
        self.controller.pause().await
    }

    pub async fn resume(&self) -> CommandResult {
        self.controller.resume().await
    }

    pub async fn stop(&self) -> CommandResult {
        self.controller.stop().await
    }

    pub async fn seek(&self, unit_index: usize) -> CommandResult {
        self.controller.seek(unit_index).await
    }

    pub async fn set_mode(&self, mode: PlayMode) -> CommandResult {
        self.holder.set_play_mode(mode).await
    }

    pub async fn update_settings(&self, update: SettingsUpdate) -> CommandResult {
        self.controller.update_settings(update).await
    }

    pub async fn engine_healthy(&self) -> bool {
        self.controller.engine_healthy().await
    }
}

impl Drop for GlobalControllerMount {
    fn drop(&mut self) {
        self.holder.release_mount();
        tracing::info!("Global playback controller unmounted");
    }
}
