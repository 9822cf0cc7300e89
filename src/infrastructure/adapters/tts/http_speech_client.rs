//! HTTP Speech Client - 调用外部语音朗读 HTTP 服务
//!
//! 实现 SpeechSynthesizerPort trait
//!
//! 外部 API:
//! POST {base_url}/api/tts/speak
//! Request: {"text": "...", "voice": "en-US" | null, "rate": 1.0}  (JSON)
//! Response: 2xx 表示朗读结束，可选 header `X-TTS-Duration-Ms`
//!           404 / 422 表示音色或文本不可用

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

use crate::application::ports::{SpeakReport, SpeakRequest, SpeechSynthesizerPort};
use crate::domain::playback::{PlaybackSessionId, SynthesisError};

/// 朗读请求体 (JSON)
#[derive(Debug, Serialize)]
struct SpeakHttpRequest<'a> {
    text: &'a str,
    voice: Option<&'a str>,
    rate: f32,
}

/// HTTP Speech Client 配置
#[derive(Debug, Clone)]
pub struct HttpSpeechClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpSpeechClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 60,
        }
    }
}

impl HttpSpeechClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP Speech Client
pub struct HttpSpeechClient {
    client: Client,
    config: HttpSpeechClientConfig,
    /// session_id -> 取消信号
    cancellations: DashMap<PlaybackSessionId, oneshot::Sender<()>>,
    /// 已取消的最大会话 ID。会话 ID 严格递增，取消可能先于 speak 到达
    cancelled_up_to: AtomicU64,
}

impl HttpSpeechClient {
    /// 创建新的客户端
    pub fn new(config: HttpSpeechClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            config,
            cancellations: DashMap::new(),
            cancelled_up_to: AtomicU64::new(0),
        })
    }

    fn speak_url(&self) -> String {
        format!("{}/api/tts/speak", self.config.base_url.trim_end_matches('/'))
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url.trim_end_matches('/'))
    }

    async fn send(&self, request: &SpeakRequest) -> Result<SpeakReport, SynthesisError> {
        let body = SpeakHttpRequest {
            text: &request.text,
            voice: request.settings.voice.as_deref(),
            rate: request.settings.rate,
        };

        let response = self
            .client
            .post(self.speak_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Unavailable("speech service timed out".to_string())
                } else if e.is_connect() {
                    SynthesisError::Unavailable(format!("Cannot connect to speech service: {}", e))
                } else {
                    SynthesisError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(map_status(status, &error_text));
        }

        let duration_ms = response
            .headers()
            .get("X-TTS-Duration-Ms")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());

        Ok(SpeakReport { duration_ms })
    }
}

fn map_status(status: StatusCode, body: &str) -> SynthesisError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
            SynthesisError::Unavailable(format!("voice or text rejected: {}", body))
        }
        _ => SynthesisError::Unavailable(format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl SpeechSynthesizerPort for HttpSpeechClient {
    async fn speak(&self, request: SpeakRequest) -> Result<SpeakReport, SynthesisError> {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.cancellations.insert(request.session_id, cancel_tx);
        if request.session_id.value() <= self.cancelled_up_to.load(Ordering::SeqCst) {
            self.cancellations.remove(&request.session_id);
            tracing::debug!(session_id = %request.session_id, "Speak request already cancelled");
            return Err(SynthesisError::Interrupted);
        }

        tracing::debug!(
            url = %self.speak_url(),
            session_id = %request.session_id,
            text_len = request.text.len(),
            "Sending speak request"
        );

        let result = tokio::select! {
            result = self.send(&request) => result,
            _ = cancel_rx => Err(SynthesisError::Interrupted),
        };

        self.cancellations.remove(&request.session_id);
        result
    }

    fn cancel(&self, session_id: PlaybackSessionId) {
        self.cancelled_up_to
            .fetch_max(session_id.value(), Ordering::SeqCst);
        if let Some((_, cancel)) = self.cancellations.remove(&session_id) {
            let _ = cancel.send(());
        }
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
