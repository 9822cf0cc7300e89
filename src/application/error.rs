//! 应用层错误定义
//!
//! 统一的播放控制错误类型

use thiserror::Error;

use crate::domain::playback::PlaybackError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 控制器任务已停止（邮箱关闭）
    #[error("Playback controller unavailable")]
    ControllerUnavailable,

    /// 全局控制器已挂载
    #[error("Global playback controller already mounted")]
    AlreadyMounted,

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<PlaybackError> for ApplicationError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::InvalidUnit { .. } => Self::InvalidState(err.to_string()),
            PlaybackError::InvalidSettings(_) => Self::ValidationError(err.to_string()),
        }
    }
}
