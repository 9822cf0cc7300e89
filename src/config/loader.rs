//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, SynthesisEngineKind};
use crate::domain::playback::{MAX_RATE, MIN_RATE};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "READALONG";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `READALONG_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `READALONG_SERVER__PORT=8080`
/// - `READALONG_SYNTHESIS__ENGINE=http`
/// - `READALONG_SYNTHESIS__URL=http://tts-server:8000`
/// - `READALONG_PLAYBACK__DEFAULT_MODE=loop`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("synthesis.engine", "fake")?
        .set_default("synthesis.url", "http://localhost:8000")?
        .set_default("synthesis.timeout_secs", 60)?
        .set_default("synthesis.rate", 1.0)?
        .set_default("playback.default_mode", "single")?
        .set_default("playback.segmentation", "sentence")?
        .set_default("playback.min_chars", 12)?
        .set_default("playback.mailbox_capacity", 64)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub(crate) fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.synthesis.engine == SynthesisEngineKind::Http && config.synthesis.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Synthesis URL cannot be empty when engine is http".to_string(),
        ));
    }

    if !(MIN_RATE..=MAX_RATE).contains(&config.synthesis.rate) {
        return Err(ConfigError::ValidationError(format!(
            "Synthesis rate must be within {}..={}",
            MIN_RATE, MAX_RATE
        )));
    }

    if config.playback.mailbox_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "Playback mailbox capacity cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Synthesis Engine: {}", config.synthesis.engine.as_str());
    if config.synthesis.engine == SynthesisEngineKind::Http {
        tracing::info!("Synthesis URL: {}", config.synthesis.url);
        tracing::info!("Synthesis Timeout: {}s", config.synthesis.timeout_secs);
    }
    tracing::info!(
        "Voice: {}",
        config.synthesis.voice.as_deref().unwrap_or("(engine default)")
    );
    tracing::info!("Rate: {}", config.synthesis.rate);
    tracing::info!("Default Mode: {}", config.playback.default_mode);
    tracing::info!("Segmentation: {}", config.playback.segmentation.as_str());
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SegmentationKind;
    use crate::domain::playback::PlayMode;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_empty_url_only_rejected_for_http_engine() {
        let mut config = AppConfig::default();
        config.synthesis.url = String::new();
        assert!(validate_config(&config).is_ok());

        config.synthesis.engine = SynthesisEngineKind::Http;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_rate_out_of_range() {
        let mut config = AppConfig::default();
        config.synthesis.rate = 3.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_mailbox() {
        let mut config = AppConfig::default();
        config.playback.mailbox_capacity = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[playback]\ndefault_mode = \"loop\"\nsegmentation = \"whole\"\n\n[synthesis]\nvoice = \"alloy\""
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.playback.default_mode, PlayMode::Loop);
        assert_eq!(config.playback.segmentation, SegmentationKind::Whole);
        assert_eq!(config.playback.min_chars, 12);
        assert_eq!(config.synthesis.voice.as_deref(), Some("alloy"));
        assert_eq!(config.synthesis.engine, SynthesisEngineKind::Fake);
    }
}
