//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod segmenter;
pub mod tts;

pub use segmenter::*;
pub use tts::*;
