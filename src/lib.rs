//! Readalong - 选中文本朗读播放核心
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Playback Context: 播放模式、控制器状态机、会话 ID、合成错误
//! - Text Segmenter: 选中文本切分为朗读单元
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesizer, SelectionSource, TextSegmenter）
//! - Commands: 发送给控制器的播放命令
//!
//! 基础设施层 (infrastructure/):
//! - Worker: PlaybackWorker 控制器任务（状态唯一写入方）
//! - Memory: PlaybackStateHolder 状态持有者
//! - Selection: 选区来源与 SelectionWatcher
//! - Mount: GlobalControllerMount 全局控制入口
//! - Runtime: 播放核心初始化与销毁
//! - Adapters: 语音合成客户端, 分段器
//! - Events: 播放事件广播
//! - HTTP: RESTful API + WebSocket

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
