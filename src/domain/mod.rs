//! Domain Layer - 领域层
//!
//! 限界上下文:
//! - Playback Context: 朗读播放状态机

pub mod playback;

// 共享的文本分割器
mod text_segmenter;

pub use text_segmenter::{segment_text, SegmentConfig, DEFAULT_MIN_CHARS};
