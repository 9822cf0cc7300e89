//! TTS Adapter - 语音合成引擎实现

mod fake_speech_synthesizer;
mod http_speech_client;

pub use fake_speech_synthesizer::{
    FakeSpeechBehavior, FakeSpeechSynthesizer, FakeSpeechSynthesizerConfig,
};
pub use http_speech_client::{HttpSpeechClient, HttpSpeechClientConfig};
