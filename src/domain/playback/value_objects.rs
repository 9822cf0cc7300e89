//! Playback Context - Value Objects

use serde::{Deserialize, Serialize};

use super::PlaybackError;

/// 播放模式
///
/// 决定一个单元播放完成后的后续行为，同一时刻只有一个模式生效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// 播放一次后停止
    #[default]
    Single,
    /// 顺序播放，到最后一个单元后停止
    Sequential,
    /// 整体循环，最后一个单元后回到第一个
    Loop,
    /// 单元循环，反复播放当前单元
    SingleLoop,
}

impl PlayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayMode::Single => "single",
            PlayMode::Sequential => "sequential",
            PlayMode::Loop => "loop",
            PlayMode::SingleLoop => "single_loop",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "single" => Some(PlayMode::Single),
            "sequential" => Some(PlayMode::Sequential),
            "loop" => Some(PlayMode::Loop),
            "single_loop" => Some(PlayMode::SingleLoop),
            _ => None,
        }
    }
}

impl std::fmt::Display for PlayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 播放控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    #[default]
    Idle,
    Playing,
    Paused,
    /// 瞬态：sequential / loop 模式下切换到下一单元
    Advancing,
}

impl ControllerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Playing => "playing",
            ControllerState::Paused => "paused",
            ControllerState::Advancing => "advancing",
        }
    }

    /// 是否存在进行中的播放上下文
    pub fn is_active(&self) -> bool {
        !matches!(self, ControllerState::Idle)
    }
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 播放会话 ID
///
/// 每次合成尝试分配一个严格递增的 ID，用于丢弃过期的异步完成回调
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackSessionId(u64);

impl PlaybackSessionId {
    /// 尚未开始任何播放
    pub const NONE: PlaybackSessionId = PlaybackSessionId(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for PlaybackSessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 语速下限
pub const MIN_RATE: f32 = 0.5;
/// 语速上限
pub const MAX_RATE: f32 = 2.0;

/// 朗读设置（音色与语速）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// 音色名称，None 表示由合成引擎自选
    pub voice: Option<String>,
    /// 语速，1.0 为正常速度
    pub rate: f32,
}

impl SpeechSettings {
    pub fn new(voice: Option<String>, rate: f32) -> Result<Self, PlaybackError> {
        let settings = Self { voice, rate };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), PlaybackError> {
        if !(MIN_RATE..=MAX_RATE).contains(&self.rate) {
            return Err(PlaybackError::InvalidSettings(format!(
                "rate must be within {}..={}, got {}",
                MIN_RATE, MAX_RATE, self.rate
            )));
        }
        if let Some(voice) = &self.voice {
            if voice.trim().is_empty() {
                return Err(PlaybackError::InvalidSettings(
                    "voice name cannot be blank".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 1.0,
        }
    }
}

/// 朗读设置的局部更新，未提供的字段保持不变
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    /// `Some(None)` 恢复引擎默认音色
    pub voice: Option<Option<String>>,
    pub rate: Option<f32>,
}

impl SettingsUpdate {
    /// 合并到当前设置并校验
    pub fn apply_to(&self, current: &SpeechSettings) -> Result<SpeechSettings, PlaybackError> {
        let merged = SpeechSettings {
            voice: match &self.voice {
                Some(voice) => voice.clone(),
                None => current.voice.clone(),
            },
            rate: self.rate.unwrap_or(current.rate),
        };
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_mode_round_trip_names() {
        for mode in [
            PlayMode::Single,
            PlayMode::Sequential,
            PlayMode::Loop,
            PlayMode::SingleLoop,
        ] {
            assert_eq!(PlayMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(PlayMode::from_str("shuffle"), None);
    }

    #[test]
    fn test_play_mode_serde_snake_case() {
        let json = serde_json::to_string(&PlayMode::SingleLoop).unwrap();
        assert_eq!(json, "\"single_loop\"");
        let mode: PlayMode = serde_json::from_str("\"loop\"").unwrap();
        assert_eq!(mode, PlayMode::Loop);
    }

    #[test]
    fn test_session_id_increments() {
        let id = PlaybackSessionId::NONE;
        assert_eq!(id.next().value(), 1);
        assert!(id.next() > id);
    }

    #[test]
    fn test_speech_settings_rate_bounds() {
        assert!(SpeechSettings::new(None, 1.0).is_ok());
        assert!(SpeechSettings::new(None, 0.4).is_err());
        assert!(SpeechSettings::new(None, 2.5).is_err());
        assert!(SpeechSettings::new(Some("  ".to_string()), 1.0).is_err());
        assert!(SpeechSettings::new(Some("en-GB".to_string()), 2.0).is_ok());
    }

    #[test]
    fn test_settings_update_merges_fields() {
        let current = SpeechSettings::new(Some("en-GB".to_string()), 1.2).unwrap();

        let rate_only = SettingsUpdate {
            rate: Some(1.8),
            ..Default::default()
        };
        let merged = rate_only.apply_to(&current).unwrap();
        assert_eq!(merged.voice.as_deref(), Some("en-GB"));
        assert_eq!(merged.rate, 1.8);

        let reset_voice = SettingsUpdate {
            voice: Some(None),
            ..Default::default()
        };
        let merged = reset_voice.apply_to(&current).unwrap();
        assert_eq!(merged.voice, None);
        assert_eq!(merged.rate, 1.2);

        let invalid = SettingsUpdate {
            rate: Some(9.0),
            ..Default::default()
        };
        assert!(invalid.apply_to(&current).is_err());
    }
}
