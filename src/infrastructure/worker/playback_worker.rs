//! Playback Worker - 播放控制器任务
//!
//! 唯一的播放状态写入方。按到达顺序逐条处理邮箱中的控制命令与合成结果，
//! 把状态机产生的副作用下发给合成引擎，并向读者发布快照与事件。

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    SpeakRequest, SpeechSynthesizerPort, SynthesisOutcome, TextSegmenterPort,
};
use crate::application::PlaybackCommand;
use crate::domain::playback::{Effect, PlaybackMachine, PlaybackSessionId, PlaybackSnapshot};
use crate::infrastructure::events::EventPublisher;

/// 命令处理结果
pub type CommandResult = Result<PlaybackSnapshot, ApplicationError>;

/// 控制器邮箱消息
#[derive(Debug)]
pub enum ControllerMessage {
    Command {
        command: PlaybackCommand,
        reply: oneshot::Sender<CommandResult>,
    },
    Shutdown,
}

/// 控制器邮箱发送端
#[derive(Debug, Clone)]
pub struct ControllerMailbox {
    sender: mpsc::Sender<ControllerMessage>,
}

impl ControllerMailbox {
    pub fn new(sender: mpsc::Sender<ControllerMessage>) -> Self {
        Self { sender }
    }

    /// 投递命令并等待控制器处理完成
    pub async fn dispatch(&self, command: PlaybackCommand) -> CommandResult {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(ControllerMessage::Command { command, reply })
            .await
            .map_err(|_| ApplicationError::ControllerUnavailable)?;
        rx.await.map_err(|_| ApplicationError::ControllerUnavailable)?
    }

    /// 请求控制器任务退出
    pub async fn shutdown(&self) {
        if self.sender.send(ControllerMessage::Shutdown).await.is_err() {
            tracing::debug!("PlaybackWorker already stopped");
        }
    }
}

/// 播放控制器 Worker
pub struct PlaybackWorker {
    machine: PlaybackMachine,
    mailbox: mpsc::Receiver<ControllerMessage>,
    outcome_tx: mpsc::UnboundedSender<SynthesisOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SynthesisOutcome>,
    synthesizer: Arc<dyn SpeechSynthesizerPort>,
    segmenter: Arc<dyn TextSegmenterPort>,
    state_tx: watch::Sender<PlaybackSnapshot>,
    event_publisher: Arc<EventPublisher>,
    /// 进行中的朗读任务，取消时中止
    in_flight: Option<(PlaybackSessionId, JoinHandle<()>)>,
}

impl PlaybackWorker {
    pub fn new(
        machine: PlaybackMachine,
        mailbox: mpsc::Receiver<ControllerMessage>,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        segmenter: Arc<dyn TextSegmenterPort>,
        state_tx: watch::Sender<PlaybackSnapshot>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            machine,
            mailbox,
            outcome_tx,
            outcome_rx,
            synthesizer,
            segmenter,
            state_tx,
            event_publisher,
            in_flight: None,
        }
    }

    /// 启动 Worker，直到收到 Shutdown 或所有发送端被丢弃
    pub async fn run(mut self) {
        tracing::info!(
            mode = %self.machine.mode(),
            segmenter = self.segmenter.name(),
            "PlaybackWorker started"
        );

        loop {
            tokio::select! {
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome);
                }
                message = self.mailbox.recv() => match message {
                    Some(ControllerMessage::Command { command, reply }) => {
                        let result = self.handle_command(command);
                        // 调用方可能已放弃等待
                        let _ = reply.send(result);
                    }
                    Some(ControllerMessage::Shutdown) | None => break,
                },
            }
        }

        if let Some(session_id) = self.in_flight.as_ref().map(|(id, _)| *id) {
            self.cancel(session_id);
        }
        tracing::info!("PlaybackWorker stopped");
    }

    fn handle_command(&mut self, command: PlaybackCommand) -> CommandResult {
        tracing::debug!(command = command.name(), state = %self.machine.state(), "Handling command");

        let effects = match command {
            PlaybackCommand::SelectText(text) => {
                let text = text.trim();
                if text == self.machine.selected_text() {
                    Vec::new()
                } else {
                    let units = self.segmenter.segment(text);
                    let effects = self.machine.select_text(text, units);
                    self.event_publisher
                        .publish_selection_changed(text, self.machine.units().len());
                    tracing::info!(
                        chars = text.chars().count(),
                        units = self.machine.units().len(),
                        "Selection adopted"
                    );
                    effects
                }
            }
            PlaybackCommand::SetMode(mode) => {
                if self.machine.set_mode(mode) {
                    self.event_publisher.publish_mode_changed(mode);
                    tracing::info!(mode = %mode, "Play mode changed");
                }
                Vec::new()
            }
            PlaybackCommand::UpdateSettings(update) => {
                self.machine.update_settings(&update)?;
                Vec::new()
            }
            PlaybackCommand::Play => self.machine.play(),
            PlaybackCommand::Pause => self.machine.pause(),
            PlaybackCommand::Resume => self.machine.resume(),
            PlaybackCommand::Stop => self.machine.stop(),
            PlaybackCommand::Seek(unit_index) => self.machine.seek(unit_index)?,
        };

        self.publish_transitions();
        self.apply(effects);
        Ok(self.publish_state())
    }

    fn handle_outcome(&mut self, outcome: SynthesisOutcome) {
        if matches!(&self.in_flight, Some((id, _)) if *id == outcome.session_id) {
            self.in_flight = None;
        }

        let effects = match outcome.result {
            Ok(report) => {
                tracing::debug!(
                    session_id = %outcome.session_id,
                    unit_index = outcome.unit_index,
                    duration_ms = ?report.duration_ms,
                    "Unit completed"
                );
                self.machine.on_unit_completed(outcome.session_id)
            }
            Err(error) => {
                tracing::debug!(
                    session_id = %outcome.session_id,
                    unit_index = outcome.unit_index,
                    error = %error,
                    "Unit failed"
                );
                self.machine.on_unit_failed(outcome.session_id, error)
            }
        };

        self.publish_transitions();
        self.apply(effects);
        self.publish_state();
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Speak {
                    session_id,
                    unit_index,
                    text,
                    settings,
                } => self.speak(SpeakRequest {
                    session_id,
                    unit_index,
                    text,
                    settings,
                }),
                Effect::Cancel { session_id } => self.cancel(session_id),
                Effect::Surface(error) => {
                    tracing::warn!(
                        session_id = %self.machine.session_id(),
                        error = %error,
                        "Playback returned to idle"
                    );
                    self.event_publisher
                        .publish_error(self.machine.session_id(), &error);
                }
            }
        }
    }

    /// 提交带标签的朗读请求，结果通过 outcome 通道回到邮箱循环
    fn speak(&mut self, request: SpeakRequest) {
        let session_id = request.session_id;
        let unit_index = request.unit_index;

        self.event_publisher
            .publish_unit_started(session_id, unit_index, &request.text);
        tracing::info!(
            session_id = %session_id,
            unit_index = unit_index,
            mode = %self.machine.mode(),
            "Speaking unit"
        );

        let synthesizer = self.synthesizer.clone();
        let outcome_tx = self.outcome_tx.clone();

        let handle = tokio::spawn(async move {
            let result = synthesizer.speak(request).await;
            let outcome = SynthesisOutcome {
                session_id,
                unit_index,
                result,
            };
            if outcome_tx.send(outcome).is_err() {
                tracing::debug!(session_id = %session_id, "PlaybackWorker gone, outcome dropped");
            }
        });
        self.in_flight = Some((session_id, handle));
    }

    /// 中止朗读任务并通知引擎取消
    ///
    /// 任务可能尚未把请求交给引擎，引擎侧需自行记住已取消的会话
    fn cancel(&mut self, session_id: PlaybackSessionId) {
        if let Some((id, handle)) = self.in_flight.take() {
            if id == session_id {
                handle.abort();
            } else {
                self.in_flight = Some((id, handle));
            }
        }
        self.synthesizer.cancel(session_id);
        tracing::debug!(session_id = %session_id, "Synthesis cancelled");
    }

    fn publish_transitions(&mut self) {
        for transition in self.machine.take_transitions() {
            tracing::debug!(
                from = %transition.from,
                to = %transition.to,
                session_id = %transition.session_id,
                unit_index = transition.unit_index,
                "State transition"
            );
            self.event_publisher.publish_state_changed(
                transition.from,
                transition.to,
                transition.session_id,
                transition.unit_index,
            );
        }
    }

    fn publish_state(&self) -> PlaybackSnapshot {
        let snapshot = self.machine.snapshot();
        self.state_tx.send_replace(snapshot.clone());
        snapshot
    }
}
