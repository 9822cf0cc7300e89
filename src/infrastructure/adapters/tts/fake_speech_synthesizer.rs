//! Fake Speech Synthesizer - 用于测试和本地演示的合成引擎
//!
//! 不实际发声：自动模式按文本长度和语速模拟朗读时长，
//! 手动模式挂起每个请求，直到调用方显式完成或失败。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{oneshot, Notify};

use crate::application::ports::{SpeakReport, SpeakRequest, SpeechSynthesizerPort};
use crate::domain::playback::{PlaybackSessionId, SynthesisError};

type PendingReply = oneshot::Sender<Result<SpeakReport, SynthesisError>>;

/// 完成方式
#[derive(Debug, Clone, PartialEq)]
pub enum FakeSpeechBehavior {
    /// 按每字符耗时模拟朗读，自动完成
    Auto { ms_per_char: u64 },
    /// 挂起直到 `finish` / `fail`
    Manual,
}

/// Fake Speech Synthesizer 配置
#[derive(Debug, Clone)]
pub struct FakeSpeechSynthesizerConfig {
    pub behavior: FakeSpeechBehavior,
    /// 视为不可用的音色
    pub unavailable_voices: Vec<String>,
    /// 为 false 时忽略取消请求，模拟取消后仍异步完成的引擎
    pub honor_cancel: bool,
}

impl Default for FakeSpeechSynthesizerConfig {
    fn default() -> Self {
        Self {
            behavior: FakeSpeechBehavior::Auto { ms_per_char: 40 },
            unavailable_voices: Vec::new(),
            honor_cancel: true,
        }
    }
}

impl FakeSpeechSynthesizerConfig {
    pub fn manual() -> Self {
        Self {
            behavior: FakeSpeechBehavior::Manual,
            ..Default::default()
        }
    }
}

/// Fake Speech Synthesizer
pub struct FakeSpeechSynthesizer {
    config: FakeSpeechSynthesizerConfig,
    calls: Mutex<Vec<SpeakRequest>>,
    cancelled: Mutex<Vec<PlaybackSessionId>>,
    pending: DashMap<PlaybackSessionId, PendingReply>,
    call_notify: Notify,
}

impl FakeSpeechSynthesizer {
    pub fn new(config: FakeSpeechSynthesizerConfig) -> Self {
        tracing::info!(behavior = ?config.behavior, "FakeSpeechSynthesizer initialized");
        Self {
            config,
            calls: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            pending: DashMap::new(),
            call_notify: Notify::new(),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeSpeechSynthesizerConfig::default())
    }

    /// 所有收到的朗读请求
    pub fn calls(&self) -> Vec<SpeakRequest> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// 所有收到的取消请求
    pub fn cancelled(&self) -> Vec<PlaybackSessionId> {
        self.cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// 尚未完成的手动模式请求数
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// 等待直到至少收到 `count` 个朗读请求
    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.call_notify.notified();
            if self.call_count() >= count {
                return;
            }
            notified.await;
        }
    }

    /// 手动模式：让指定会话朗读成功
    pub fn finish(&self, session_id: PlaybackSessionId) -> bool {
        self.resolve(session_id, Ok(SpeakReport::default()))
    }

    /// 手动模式：让指定会话朗读失败
    pub fn fail(&self, session_id: PlaybackSessionId, error: SynthesisError) -> bool {
        self.resolve(session_id, Err(error))
    }

    fn resolve(
        &self,
        session_id: PlaybackSessionId,
        result: Result<SpeakReport, SynthesisError>,
    ) -> bool {
        match self.pending.remove(&session_id) {
            Some((_, reply)) => reply.send(result).is_ok(),
            None => false,
        }
    }

    /// 取消可能先于 speak 到达
    fn cancelled_before(&self, session_id: PlaybackSessionId) -> bool {
        self.config.honor_cancel
            && self
                .cancelled
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .contains(&session_id)
    }

    fn record(&self, request: SpeakRequest) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        self.call_notify.notify_waiters();
    }
}

#[async_trait]
impl SpeechSynthesizerPort for FakeSpeechSynthesizer {
    async fn speak(&self, request: SpeakRequest) -> Result<SpeakReport, SynthesisError> {
        tracing::debug!(
            session_id = %request.session_id,
            unit_index = request.unit_index,
            text_len = request.text.len(),
            "FakeSpeechSynthesizer: speak"
        );

        if let Some(voice) = &request.settings.voice {
            if self.config.unavailable_voices.iter().any(|v| v == voice) {
                let error = SynthesisError::Unavailable(format!("voice not installed: {}", voice));
                self.record(request);
                return Err(error);
            }
        }

        match self.config.behavior {
            FakeSpeechBehavior::Auto { ms_per_char } => {
                let chars = request.text.chars().count() as u64;
                let rate = f64::from(request.settings.rate.max(0.1));
                let duration_ms = ((chars * ms_per_char) as f64 / rate) as u64;
                let session_id = request.session_id;
                self.record(request);
                if self.cancelled_before(session_id) {
                    return Err(SynthesisError::Interrupted);
                }
                tokio::time::sleep(Duration::from_millis(duration_ms)).await;
                Ok(SpeakReport {
                    duration_ms: Some(duration_ms),
                })
            }
            FakeSpeechBehavior::Manual => {
                let (reply, rx) = oneshot::channel();
                let session_id = request.session_id;
                // 先登记再检查，与 cancel 的先记录后移除配对
                self.pending.insert(session_id, reply);
                self.record(request);
                if self.cancelled_before(session_id) {
                    self.pending.remove(&session_id);
                    return Err(SynthesisError::Interrupted);
                }
                rx.await.unwrap_or(Err(SynthesisError::Interrupted))
            }
        }
    }

    fn cancel(&self, session_id: PlaybackSessionId) {
        self.cancelled
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(session_id);
        if self.config.honor_cancel {
            // 丢弃 reply 发送端，挂起的 speak 以 Interrupted 结束
            self.pending.remove(&session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::SpeechSettings;
    use std::sync::Arc;

    fn request(session: u64, voice: Option<&str>) -> SpeakRequest {
        SpeakRequest {
            session_id: PlaybackSessionId::new(session),
            unit_index: 0,
            text: "Hello there.".to_string(),
            settings: SpeechSettings {
                voice: voice.map(str::to_string),
                rate: 1.0,
            },
        }
    }

    #[tokio::test]
    async fn test_manual_finish() {
        let fake = Arc::new(FakeSpeechSynthesizer::new(FakeSpeechSynthesizerConfig::manual()));
        let task = {
            let fake = fake.clone();
            tokio::spawn(async move { fake.speak(request(1, None)).await })
        };

        fake.wait_for_calls(1).await;
        assert!(fake.finish(PlaybackSessionId::new(1)));
        assert!(task.await.unwrap().is_ok());
        assert!(!fake.finish(PlaybackSessionId::new(1)));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_speak() {
        let fake = Arc::new(FakeSpeechSynthesizer::new(FakeSpeechSynthesizerConfig::manual()));
        let task = {
            let fake = fake.clone();
            tokio::spawn(async move { fake.speak(request(4, None)).await })
        };

        fake.wait_for_calls(1).await;
        fake.cancel(PlaybackSessionId::new(4));
        assert_eq!(task.await.unwrap().unwrap_err(), SynthesisError::Interrupted);
        assert_eq!(fake.cancelled(), vec![PlaybackSessionId::new(4)]);
    }

    #[tokio::test]
    async fn test_cancel_before_speak_is_remembered() {
        let fake = FakeSpeechSynthesizer::new(FakeSpeechSynthesizerConfig::manual());
        fake.cancel(PlaybackSessionId::new(7));

        let result = tokio::time::timeout(
            Duration::from_secs(1),
            fake.speak(request(7, None)),
        )
        .await
        .expect("speak should not hang after an earlier cancel");
        assert_eq!(result.unwrap_err(), SynthesisError::Interrupted);
        assert_eq!(fake.pending_count(), 0);
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_voice() {
        let fake = FakeSpeechSynthesizer::new(FakeSpeechSynthesizerConfig {
            unavailable_voices: vec!["robot".to_string()],
            ..FakeSpeechSynthesizerConfig::manual()
        });
        let result = fake.speak(request(1, Some("robot"))).await;
        assert!(matches!(result, Err(SynthesisError::Unavailable(_))));
        assert_eq!(fake.call_count(), 1);
    }

    #[tokio::test]
    async fn test_auto_mode_completes() {
        let fake = FakeSpeechSynthesizer::new(FakeSpeechSynthesizerConfig {
            behavior: FakeSpeechBehavior::Auto { ms_per_char: 0 },
            ..Default::default()
        });
        let report = fake.speak(request(1, None)).await.unwrap();
        assert_eq!(report.duration_ms, Some(0));
    }
}
