//! Playback State Holder
//!
//! 进程级播放状态的唯一访问入口。读取走 watch 通道上的最新快照，
//! 写入全部以命令形式投递给控制器任务（唯一写入方）。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::application::error::ApplicationError;
use crate::application::PlaybackCommand;
use crate::domain::playback::{ControllerState, PlayMode, PlaybackSnapshot};
use crate::infrastructure::worker::{CommandResult, ControllerMailbox};

/// 播放状态持有者
#[derive(Debug, Clone)]
pub struct PlaybackStateHolder {
    mailbox: ControllerMailbox,
    state: watch::Receiver<PlaybackSnapshot>,
    mounted: Arc<AtomicBool>,
}

impl PlaybackStateHolder {
    pub fn new(mailbox: ControllerMailbox, state: watch::Receiver<PlaybackSnapshot>) -> Self {
        Self {
            mailbox,
            state,
            mounted: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 当前选中文本
    pub fn selected_text(&self) -> String {
        self.state.borrow().selected_text.clone()
    }

    /// 设置选中文本（去除首尾空白）
    ///
    /// 新的非空文本会先终止进行中的播放；相同文本不打断播放
    pub async fn set_selected_text(&self, text: impl Into<String>) -> CommandResult {
        let text = text.into().trim().to_string();
        self.mailbox
            .dispatch(PlaybackCommand::SelectText(text))
            .await
    }

    /// 当前播放模式
    pub fn play_mode(&self) -> PlayMode {
        self.state.borrow().mode
    }

    /// 设置播放模式
    pub async fn set_play_mode(&self, mode: PlayMode) -> CommandResult {
        self.mailbox.dispatch(PlaybackCommand::SetMode(mode)).await
    }

    /// 当前控制器状态
    pub fn status(&self) -> ControllerState {
        self.state.borrow().state
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().is_playing
    }

    /// 完整快照
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.state.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.state.clone()
    }

    /// 等待直到快照满足条件
    pub async fn wait_for<F>(&self, predicate: F) -> CommandResult
    where
        F: FnMut(&PlaybackSnapshot) -> bool,
    {
        let mut rx = self.state.clone();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|_| ApplicationError::ControllerUnavailable)?;
        Ok(snapshot.clone())
    }

    pub(crate) fn try_acquire_mount(&self) -> bool {
        self.mounted
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn release_mount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }
}
