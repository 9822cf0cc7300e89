//! Playback Context - Errors

use serde::Serialize;
use thiserror::Error;

/// 语音合成错误
///
/// 两类错误都可在本地恢复：控制器回到 Idle 并向 UI 暴露一个临时状态指示
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// 引擎无法为给定文本/音色生成语音
    #[error("Speech synthesis unavailable: {0}")]
    Unavailable(String),

    /// 被更新的请求取消
    #[error("Speech synthesis interrupted")]
    Interrupted,
}

impl SynthesisError {
    pub fn kind(&self) -> &'static str {
        match self {
            SynthesisError::Unavailable(_) => "synthesis_unavailable",
            SynthesisError::Interrupted => "synthesis_interrupted",
        }
    }

    pub fn indicator(&self) -> StatusIndicator {
        StatusIndicator {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// 暴露给 UI 的临时错误指示
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub kind: &'static str,
    pub message: String,
}

/// 播放控制错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("Unit index out of range: {index} (total units: {total})")]
    InvalidUnit { index: usize, total: usize },

    #[error("Invalid speech settings: {0}")]
    InvalidSettings(String),
}
