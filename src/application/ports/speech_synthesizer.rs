//! Speech Synthesizer Port - 语音合成引擎抽象
//!
//! 控制器提交带会话 ID 的朗读请求，引擎在单元朗读结束（或失败）时返回，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;

use crate::domain::playback::{PlaybackSessionId, SpeechSettings, SynthesisError};

/// 朗读请求
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    /// 本次合成尝试的会话 ID
    pub session_id: PlaybackSessionId,
    /// 单元索引（用于日志和追踪）
    pub unit_index: usize,
    /// 要朗读的文本
    pub text: String,
    /// 音色与语速
    pub settings: SpeechSettings,
}

/// 朗读完成报告
#[derive(Debug, Clone, Default)]
pub struct SpeakReport {
    /// 实际朗读时长（毫秒），引擎未提供时为 None
    pub duration_ms: Option<u64>,
}

/// 合成结果，带回请求时的会话 ID
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    pub session_id: PlaybackSessionId,
    pub unit_index: usize,
    pub result: Result<SpeakReport, SynthesisError>,
}

/// Speech Synthesizer Port
///
/// 外部语音合成引擎的抽象接口
#[async_trait]
pub trait SpeechSynthesizerPort: Send + Sync {
    /// 朗读一个单元，朗读结束后返回
    async fn speak(&self, request: SpeakRequest) -> Result<SpeakReport, SynthesisError>;

    /// 尽力取消进行中的朗读
    ///
    /// 引擎可能在取消后仍异步完成，控制器依靠会话 ID 丢弃迟到的结果
    fn cancel(&self, _session_id: PlaybackSessionId) {}

    /// 检查引擎是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
