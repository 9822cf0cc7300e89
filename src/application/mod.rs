//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesizer、SelectionSource、TextSegmenter）
//! - commands: 播放控制命令
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::PlaybackCommand;

pub use error::ApplicationError;

pub use ports::{
    // Selection source
    SelectionChanged,
    SelectionSourcePort,
    // Speech synthesizer
    SpeakReport,
    SpeakRequest,
    SpeechSynthesizerPort,
    SynthesisOutcome,
    // Text segmenter
    TextSegmenterPort,
};
