//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

use crate::domain::playback::{PlayMode, SpeechSettings};
use crate::domain::DEFAULT_MIN_CHARS;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音合成配置
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// 播放配置
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 合成引擎类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisEngineKind {
    /// 远程 HTTP 合成服务
    Http,
    /// 本地模拟引擎
    #[default]
    Fake,
}

impl SynthesisEngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisEngineKind::Http => "http",
            SynthesisEngineKind::Fake => "fake",
        }
    }
}

/// 语音合成配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisConfig {
    /// 引擎类型
    #[serde(default)]
    pub engine: SynthesisEngineKind,

    /// 合成服务基础 URL（engine = http 时使用）
    #[serde(default = "default_synthesis_url")]
    pub url: String,

    /// 单次朗读请求超时时间（秒）
    #[serde(default = "default_synthesis_timeout")]
    pub timeout_secs: u64,

    /// 默认音色
    #[serde(default)]
    pub voice: Option<String>,

    /// 默认语速
    #[serde(default = "default_rate")]
    pub rate: f32,
}

fn default_synthesis_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_synthesis_timeout() -> u64 {
    60
}

fn default_rate() -> f32 {
    1.0
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            engine: SynthesisEngineKind::default(),
            url: default_synthesis_url(),
            timeout_secs: default_synthesis_timeout(),
            voice: None,
            rate: default_rate(),
        }
    }
}

impl SynthesisConfig {
    /// 初始朗读设置
    pub fn speech_settings(&self) -> SpeechSettings {
        SpeechSettings {
            voice: self.voice.clone(),
            rate: self.rate,
        }
    }
}

/// 分段策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationKind {
    /// 按句子/分句切分
    #[default]
    Sentence,
    /// 整段作为一个单元
    Whole,
}

impl SegmentationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentationKind::Sentence => "sentence",
            SegmentationKind::Whole => "whole",
        }
    }
}

/// 播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// 启动时的播放模式
    #[serde(default)]
    pub default_mode: PlayMode,

    /// 分段策略
    #[serde(default)]
    pub segmentation: SegmentationKind,

    /// 句内弱分隔符切分的最小字符数
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,

    /// 控制器邮箱容量
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
}

fn default_min_chars() -> usize {
    DEFAULT_MIN_CHARS
}

fn default_mailbox_capacity() -> usize {
    64
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_mode: PlayMode::default(),
            segmentation: SegmentationKind::default(),
            min_chars: default_min_chars(),
            mailbox_capacity: default_mailbox_capacity(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
