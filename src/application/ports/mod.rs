//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod selection_source;
mod speech_synthesizer;
mod text_segmenter;

pub use selection_source::{SelectionChanged, SelectionSourcePort};
pub use speech_synthesizer::{SpeakReport, SpeakRequest, SpeechSynthesizerPort, SynthesisOutcome};
pub use text_segmenter::TextSegmenterPort;
