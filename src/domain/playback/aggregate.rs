//! Playback Context - Aggregate Root
//!
//! 播放控制状态机。纯同步逻辑，不做任何 I/O：每个操作返回需要执行的
//! [`Effect`] 列表，由外层的控制器任务负责向合成引擎下发请求。

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{
    ControllerState, PlayMode, PlaybackError, PlaybackSessionId, SettingsUpdate, SpeechSettings,
    StatusIndicator, SynthesisError,
};

/// 状态机产生的副作用
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// 以新的会话 ID 朗读一个单元
    Speak {
        session_id: PlaybackSessionId,
        unit_index: usize,
        text: String,
        settings: SpeechSettings,
    },
    /// 取消进行中的合成
    Cancel { session_id: PlaybackSessionId },
    /// 向 UI 暴露临时错误
    Surface(SynthesisError),
}

/// 一次状态迁移
///
/// 会话与单元索引取迁移发生那一刻的值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ControllerState,
    pub to: ControllerState,
    pub session_id: PlaybackSessionId,
    pub unit_index: usize,
}

/// 播放状态快照（只读视图）
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackSnapshot {
    pub selected_text: String,
    pub units: Vec<String>,
    pub mode: PlayMode,
    pub state: ControllerState,
    pub is_playing: bool,
    pub current_index: usize,
    pub session_id: PlaybackSessionId,
    pub last_error: Option<StatusIndicator>,
    pub settings: SpeechSettings,
    pub updated_at: DateTime<Utc>,
}

/// 播放状态机聚合根
///
/// 不变量:
/// - 同一时刻只有一个 PlayMode
/// - 只有 `Playing` 状态下、且会话 ID 与当前一致的合成结果才会被处理
/// - 会话 ID 严格递增，每次合成尝试都会分配新的 ID
/// - 选中文本变化时先终止当前播放，再采用新的文本
#[derive(Debug, Clone)]
pub struct PlaybackMachine {
    selected_text: String,
    units: Vec<String>,
    mode: PlayMode,
    state: ControllerState,
    current_index: usize,
    session_id: PlaybackSessionId,
    last_error: Option<SynthesisError>,
    settings: SpeechSettings,
    transitions: Vec<Transition>,
    updated_at: DateTime<Utc>,
}

impl PlaybackMachine {
    pub fn new(mode: PlayMode, settings: SpeechSettings) -> Self {
        Self {
            selected_text: String::new(),
            units: Vec::new(),
            mode,
            state: ControllerState::Idle,
            current_index: 0,
            session_id: PlaybackSessionId::NONE,
            last_error: None,
            settings,
            transitions: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    // Getters
    pub fn selected_text(&self) -> &str {
        &self.selected_text
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn session_id(&self) -> PlaybackSessionId {
        self.session_id
    }

    pub fn last_error(&self) -> Option<&SynthesisError> {
        self.last_error.as_ref()
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }

    pub fn is_playing(&self) -> bool {
        self.state == ControllerState::Playing
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            selected_text: self.selected_text.clone(),
            units: self.units.clone(),
            mode: self.mode,
            state: self.state,
            is_playing: self.is_playing(),
            current_index: self.current_index,
            session_id: self.session_id,
            last_error: self.last_error.as_ref().map(SynthesisError::indicator),
            settings: self.settings.clone(),
            updated_at: self.updated_at,
        }
    }

    /// 取出自上次调用以来发生的状态迁移
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    /// 采用新的选中文本及其分段结果
    ///
    /// 与当前文本相同则忽略。存在进行中的播放时先停止：
    /// 新文本非空记为 `SynthesisInterrupted`，空文本只是回到 Idle。
    pub fn select_text(&mut self, text: &str, units: Vec<String>) -> Vec<Effect> {
        let text = text.trim();
        if text == self.selected_text {
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.state.is_active() {
            effects.extend(self.cancel_in_flight());
            self.transition(ControllerState::Idle);
            if !text.is_empty() {
                self.last_error = Some(SynthesisError::Interrupted);
                effects.push(Effect::Surface(SynthesisError::Interrupted));
            }
        }

        self.selected_text = text.to_string();
        self.units = if text.is_empty() { Vec::new() } else { units };
        self.current_index = 0;
        self.touch();
        effects
    }

    /// 切换播放模式，下一次单元完成时生效
    ///
    /// 返回模式是否发生变化
    pub fn set_mode(&mut self, mode: PlayMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.mode = mode;
        self.touch();
        true
    }

    /// 合并局部设置更新，下一次合成尝试生效
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> Result<(), PlaybackError> {
        self.settings = update.apply_to(&self.settings)?;
        self.touch();
        Ok(())
    }

    /// 播放请求
    ///
    /// - Idle: 有可播放内容时从当前单元开始
    /// - Paused: 等同于 resume
    /// - Playing / Advancing: 无操作
    pub fn play(&mut self) -> Vec<Effect> {
        match self.state {
            ControllerState::Idle => {
                if self.selected_text.is_empty() || self.units.is_empty() {
                    return Vec::new();
                }
                if self.current_index >= self.units.len() {
                    self.current_index = 0;
                }
                self.last_error = None;
                self.start_attempt()
            }
            ControllerState::Paused => self.resume(),
            ControllerState::Playing | ControllerState::Advancing => Vec::new(),
        }
    }

    /// 暂停：取消进行中的合成，保留当前单元索引
    pub fn pause(&mut self) -> Vec<Effect> {
        if self.state != ControllerState::Playing {
            return Vec::new();
        }
        let effects = self.cancel_in_flight();
        self.transition(ControllerState::Paused);
        self.touch();
        effects
    }

    /// 恢复：从当前单元开头重新朗读，不跳过任何单元
    pub fn resume(&mut self) -> Vec<Effect> {
        if self.state != ControllerState::Paused {
            return Vec::new();
        }
        self.start_attempt()
    }

    /// 停止：回到 Idle，索引归零
    pub fn stop(&mut self) -> Vec<Effect> {
        if !self.state.is_active() {
            return Vec::new();
        }
        let effects = self.cancel_in_flight();
        self.transition(ControllerState::Idle);
        self.current_index = 0;
        self.touch();
        effects
    }

    /// 跳转到指定单元
    ///
    /// 播放中会取消当前合成并以新会话朗读目标单元；其他状态只移动索引
    pub fn seek(&mut self, unit_index: usize) -> Result<Vec<Effect>, PlaybackError> {
        if unit_index >= self.units.len() {
            return Err(PlaybackError::InvalidUnit {
                index: unit_index,
                total: self.units.len(),
            });
        }

        if self.state == ControllerState::Playing {
            let mut effects = self.cancel_in_flight();
            self.current_index = unit_index;
            effects.extend(self.start_attempt());
            return Ok(effects);
        }

        self.current_index = unit_index;
        self.touch();
        Ok(Vec::new())
    }

    /// 合成完成回调
    ///
    /// 会话 ID 不匹配或当前不在 Playing 状态的回调视为过期，直接丢弃
    pub fn on_unit_completed(&mut self, session_id: PlaybackSessionId) -> Vec<Effect> {
        if !self.accepts(session_id) {
            tracing::debug!(
                session_id = %session_id,
                current_session = %self.session_id,
                state = %self.state,
                "Stale completion discarded"
            );
            return Vec::new();
        }

        match self.mode {
            PlayMode::Single => {
                self.transition(ControllerState::Idle);
                self.touch();
                Vec::new()
            }
            PlayMode::SingleLoop => self.start_attempt(),
            PlayMode::Sequential => {
                if self.current_index + 1 < self.units.len() {
                    self.transition(ControllerState::Advancing);
                    self.current_index += 1;
                    self.start_attempt()
                } else {
                    self.transition(ControllerState::Idle);
                    self.current_index = 0;
                    self.touch();
                    Vec::new()
                }
            }
            PlayMode::Loop => {
                self.transition(ControllerState::Advancing);
                self.current_index = (self.current_index + 1) % self.units.len();
                self.start_attempt()
            }
        }
    }

    /// 合成失败回调：回到 Idle，记录错误，不自动重试
    pub fn on_unit_failed(
        &mut self,
        session_id: PlaybackSessionId,
        error: SynthesisError,
    ) -> Vec<Effect> {
        if !self.accepts(session_id) {
            tracing::debug!(
                session_id = %session_id,
                current_session = %self.session_id,
                "Stale failure discarded"
            );
            return Vec::new();
        }

        self.transition(ControllerState::Idle);
        self.last_error = Some(error.clone());
        self.touch();
        vec![Effect::Surface(error)]
    }

    fn accepts(&self, session_id: PlaybackSessionId) -> bool {
        self.state == ControllerState::Playing && session_id == self.session_id
    }

    fn start_attempt(&mut self) -> Vec<Effect> {
        self.session_id = self.session_id.next();
        self.transition(ControllerState::Playing);
        self.touch();

        vec![Effect::Speak {
            session_id: self.session_id,
            unit_index: self.current_index,
            text: self.units[self.current_index].clone(),
            settings: self.settings.clone(),
        }]
    }

    fn cancel_in_flight(&self) -> Vec<Effect> {
        if self.state == ControllerState::Playing {
            vec![Effect::Cancel {
                session_id: self.session_id,
            }]
        } else {
            Vec::new()
        }
    }

    fn transition(&mut self, to: ControllerState) {
        let from = self.state;
        self.state = to;
        self.transitions.push(Transition {
            from,
            to,
            session_id: self.session_id,
            unit_index: self.current_index,
        });
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for PlaybackMachine {
    fn default() -> Self {
        Self::new(PlayMode::default(), SpeechSettings::default())
    }
}
