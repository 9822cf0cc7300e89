//! Playback Runtime
//!
//! 播放核心的初始化与销毁：创建状态持有者、启动控制器任务，
//! 关闭时取消进行中的合成并等待任务退出。

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::application::ports::{SpeechSynthesizerPort, TextSegmenterPort};
use crate::domain::playback::{PlayMode, PlaybackMachine, SpeechSettings};
use crate::infrastructure::events::EventPublisher;
use crate::infrastructure::memory::PlaybackStateHolder;
use crate::infrastructure::worker::{ControllerMailbox, PlaybackController, PlaybackWorker};

/// Runtime 配置
#[derive(Debug, Clone)]
pub struct PlaybackRuntimeConfig {
    /// 启动时的播放模式
    pub default_mode: PlayMode,
    /// 启动时的朗读设置
    pub settings: SpeechSettings,
    /// 控制器邮箱容量
    pub mailbox_capacity: usize,
}

impl Default for PlaybackRuntimeConfig {
    fn default() -> Self {
        Self {
            default_mode: PlayMode::Single,
            settings: SpeechSettings::default(),
            mailbox_capacity: 64,
        }
    }
}

/// 播放核心运行时
pub struct PlaybackRuntime {
    holder: PlaybackStateHolder,
    controller: PlaybackController,
    event_publisher: Arc<EventPublisher>,
    worker: JoinHandle<()>,
}

impl PlaybackRuntime {
    /// 启动播放核心（需在 tokio 运行时内调用）
    pub fn start(
        config: PlaybackRuntimeConfig,
        synthesizer: Arc<dyn SpeechSynthesizerPort>,
        segmenter: Arc<dyn TextSegmenterPort>,
        event_publisher: Arc<EventPublisher>,
    ) -> Self {
        let machine = PlaybackMachine::new(config.default_mode, config.settings);
        let (state_tx, state_rx) = watch::channel(machine.snapshot());
        let (mailbox_tx, mailbox_rx) = mpsc::channel(config.mailbox_capacity.max(1));
        let mailbox = ControllerMailbox::new(mailbox_tx);

        let worker = PlaybackWorker::new(
            machine,
            mailbox_rx,
            synthesizer.clone(),
            segmenter,
            state_tx,
            event_publisher.clone(),
        );
        let worker = tokio::spawn(worker.run());

        Self {
            holder: PlaybackStateHolder::new(mailbox.clone(), state_rx),
            controller: PlaybackController::new(mailbox, synthesizer),
            event_publisher,
            worker,
        }
    }

    pub fn holder(&self) -> PlaybackStateHolder {
        self.holder.clone()
    }

    pub fn controller(&self) -> PlaybackController {
        self.controller.clone()
    }

    pub fn event_publisher(&self) -> Arc<EventPublisher> {
        self.event_publisher.clone()
    }

    /// 关闭播放核心
    pub async fn shutdown(self) {
        self.controller.mailbox().shutdown().await;
        if let Err(e) = self.worker.await {
            tracing::error!(error = %e, "PlaybackWorker terminated abnormally");
        }
        tracing::info!("Playback runtime shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use crate::domain::playback::{ControllerState, PlaybackSessionId, PlaybackSnapshot, SynthesisError};
    use crate::domain::SegmentConfig;
    use crate::infrastructure::adapters::{
        FakeSpeechSynthesizer, FakeSpeechSynthesizerConfig, SentenceSegmenter,
    };
    use crate::infrastructure::events::PlaybackEvent;
    use std::time::Duration;
    use tokio::sync::broadcast;

    const WAIT: Duration = Duration::from_secs(2);

    struct Harness {
        runtime: PlaybackRuntime,
        fake: Arc<FakeSpeechSynthesizer>,
        events: broadcast::Receiver<PlaybackEvent>,
    }

    impl Harness {
        fn start(mode: PlayMode) -> Self {
            Self::with_fake(mode, FakeSpeechSynthesizerConfig::manual())
        }

        fn with_fake(mode: PlayMode, fake_config: FakeSpeechSynthesizerConfig) -> Self {
            let fake = Arc::new(FakeSpeechSynthesizer::new(fake_config));
            let publisher = Arc::new(EventPublisher::new());
            let events = publisher.subscribe();
            let runtime = PlaybackRuntime::start(
                PlaybackRuntimeConfig {
                    default_mode: mode,
                    ..Default::default()
                },
                fake.clone(),
                Arc::new(SentenceSegmenter::new(SegmentConfig { min_chars: 0 })),
                publisher,
            );
            Self {
                runtime,
                fake,
                events,
            }
        }

        async fn wait_calls(&self, count: usize) {
            tokio::time::timeout(WAIT, self.fake.wait_for_calls(count))
                .await
                .expect("synthesis call not made in time");
        }

        async fn wait_state<F>(&self, predicate: F) -> PlaybackSnapshot
        where
            F: FnMut(&PlaybackSnapshot) -> bool,
        {
            tokio::time::timeout(WAIT, self.runtime.holder().wait_for(predicate))
                .await
                .expect("state not reached in time")
                .unwrap()
        }

        /// 完成第 n 次（从 1 开始）朗读请求
        async fn finish_call(&self, n: usize) -> PlaybackSessionId {
            self.wait_calls(n).await;
            let session_id = self.fake.calls()[n - 1].session_id;
            assert!(self.fake.finish(session_id));
            session_id
        }

        fn drain_events(&mut self) -> Vec<PlaybackEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }

        fn state_trail(&mut self) -> Vec<(ControllerState, ControllerState)> {
            self.drain_events()
                .into_iter()
                .filter_map(|event| match event {
                    PlaybackEvent::StateChanged { from, to, .. } => Some((from, to)),
                    _ => None,
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_single_mode_scenario() {
        let mut h = Harness::start(PlayMode::Single);
        let holder = h.runtime.holder();
        let controller = h.runtime.controller();

        holder.set_selected_text("The cat sat.").await.unwrap();
        let snapshot = controller.play().await.unwrap();
        assert_eq!(snapshot.state, ControllerState::Playing);
        assert!(holder.is_playing());

        h.finish_call(1).await;
        h.wait_state(|s| s.state == ControllerState::Idle).await;

        assert_eq!(h.fake.call_count(), 1);
        assert_eq!(h.fake.calls()[0].text, "The cat sat.");
        assert_eq!(
            h.state_trail(),
            vec![
                (ControllerState::Idle, ControllerState::Playing),
                (ControllerState::Playing, ControllerState::Idle),
            ]
        );

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_loop_mode_wraps_without_idle() {
        let mut h = Harness::start(PlayMode::Loop);
        let holder = h.runtime.holder();

        holder.set_selected_text("One. Two. Three.").await.unwrap();
        assert_eq!(holder.snapshot().units.len(), 3);
        h.runtime.controller().play().await.unwrap();

        for n in 1..=3 {
            h.finish_call(n).await;
        }
        h.wait_calls(4).await;

        let indices: Vec<usize> = h.fake.calls().iter().map(|c| c.unit_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 0]);
        assert_eq!(holder.status(), ControllerState::Playing);
        assert!(h
            .state_trail()
            .iter()
            .all(|(_, to)| *to != ControllerState::Idle));

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_new_selection_cancels_and_ignores_late_completion() {
        let mut h = Harness::with_fake(
            PlayMode::Single,
            FakeSpeechSynthesizerConfig {
                honor_cancel: false,
                ..FakeSpeechSynthesizerConfig::manual()
            },
        );
        let holder = h.runtime.holder();

        holder.set_selected_text("First passage.").await.unwrap();
        h.runtime.controller().play().await.unwrap();
        h.wait_calls(1).await;
        let stale = h.fake.calls()[0].session_id;
        h.drain_events();

        let snapshot = holder.set_selected_text("Second passage.").await.unwrap();
        assert_eq!(snapshot.state, ControllerState::Idle);
        assert_eq!(snapshot.selected_text, "Second passage.");
        assert_eq!(
            snapshot.last_error.map(|e| e.kind),
            Some("synthesis_interrupted")
        );
        assert_eq!(h.fake.cancelled(), vec![stale]);

        // 引擎在取消后才完成，结果必须被丢弃（任务可能已被中止）
        let _ = h.fake.finish(stale);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let snapshot = holder.set_play_mode(PlayMode::Single).await.unwrap();
        assert_eq!(snapshot.state, ControllerState::Idle);
        assert_eq!(h.fake.call_count(), 1);

        let events = h.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            PlaybackEvent::StateChanged {
                from: ControllerState::Playing,
                to: ControllerState::Idle,
                ..
            }
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Error { kind, .. } if kind == "synthesis_interrupted")));

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_new_selection_while_paused_interrupts_without_cancel() {
        let mut h = Harness::start(PlayMode::Sequential);
        let holder = h.runtime.holder();
        let controller = h.runtime.controller();

        holder.set_selected_text("One. Two.").await.unwrap();
        controller.play().await.unwrap();
        h.wait_calls(1).await;
        let snapshot = controller.pause().await.unwrap();
        assert_eq!(snapshot.state, ControllerState::Paused);
        assert_eq!(h.fake.cancelled().len(), 1);
        h.drain_events();

        let snapshot = holder.set_selected_text("Three.").await.unwrap();
        assert_eq!(snapshot.state, ControllerState::Idle);
        assert_eq!(
            snapshot.last_error.map(|e| e.kind),
            Some("synthesis_interrupted")
        );
        // 暂停时没有进行中的合成，不再发出取消
        assert_eq!(h.fake.cancelled().len(), 1);
        assert_eq!(h.fake.call_count(), 1);
        assert_eq!(
            h.state_trail(),
            vec![(ControllerState::Paused, ControllerState::Idle)]
        );

        h.runtime.shutdown().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_rapid_stop_leaves_no_request_open() {
        let h = Harness::start(PlayMode::Single);
        let holder = h.runtime.holder();
        let controller = h.runtime.controller();

        for round in 0..30 {
            holder
                .set_selected_text(format!("Passage number {}.", round))
                .await
                .unwrap();
            controller.play().await.unwrap();
            controller.stop().await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(h.fake.pending_count(), 0);
        let cancelled = h.fake.cancelled();
        assert_eq!(cancelled.len(), 30);
        for call in h.fake.calls() {
            assert!(cancelled.contains(&call.session_id));
        }
        assert_eq!(holder.status(), ControllerState::Idle);

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_state_events_carry_session_of_each_step() {
        let mut h = Harness::start(PlayMode::Sequential);
        let holder = h.runtime.holder();

        holder.set_selected_text("One. Two.").await.unwrap();
        h.runtime.controller().play().await.unwrap();
        h.drain_events();

        let first = h.finish_call(1).await;
        h.wait_calls(2).await;
        let second = h.fake.calls()[1].session_id;

        let steps: Vec<_> = h
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                PlaybackEvent::StateChanged {
                    to,
                    session_id,
                    unit_index,
                    ..
                } => Some((to, session_id, unit_index)),
                _ => None,
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                (ControllerState::Advancing, first, 0),
                (ControllerState::Playing, second, 1),
            ]
        );

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_selection_while_idle_has_no_transition() {
        let mut h = Harness::start(PlayMode::Single);
        let holder = h.runtime.holder();

        holder.set_selected_text("Something.").await.unwrap();
        let snapshot = holder.set_selected_text("   ").await.unwrap();
        assert_eq!(snapshot.selected_text, "");
        assert_eq!(snapshot.state, ControllerState::Idle);
        assert!(h.state_trail().is_empty());

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_play_without_selection_is_noop() {
        for mode in [
            PlayMode::Single,
            PlayMode::Sequential,
            PlayMode::Loop,
            PlayMode::SingleLoop,
        ] {
            let mut h = Harness::start(mode);
            let snapshot = h.runtime.controller().play().await.unwrap();
            assert_eq!(snapshot.state, ControllerState::Idle);
            assert_eq!(h.fake.call_count(), 0);
            assert!(h.state_trail().is_empty());
            h.runtime.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_synthesis_failure_returns_to_idle_without_retry() {
        let mut h = Harness::start(PlayMode::Loop);
        let holder = h.runtime.holder();

        holder.set_selected_text("One. Two.").await.unwrap();
        h.runtime.controller().play().await.unwrap();
        h.wait_calls(1).await;
        let session_id = h.fake.calls()[0].session_id;
        assert!(h.fake.fail(
            session_id,
            SynthesisError::Unavailable("voice missing".to_string())
        ));

        let snapshot = h.wait_state(|s| s.state == ControllerState::Idle).await;
        assert!(!snapshot.is_playing);
        assert_eq!(
            snapshot.last_error.map(|e| e.kind),
            Some("synthesis_unavailable")
        );
        assert!(h
            .drain_events()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Error { .. })));

        // 没有自动重试
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.fake.call_count(), 1);

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_pause_resume_keeps_unit_index() {
        let h = Harness::start(PlayMode::Sequential);
        let holder = h.runtime.holder();
        let controller = h.runtime.controller();

        holder.set_selected_text("One. Two. Three.").await.unwrap();
        controller.play().await.unwrap();
        h.finish_call(1).await;
        h.wait_state(|s| s.current_index == 1).await;

        let paused = controller.pause().await.unwrap();
        assert_eq!(paused.state, ControllerState::Paused);
        let again = controller.pause().await.unwrap();
        assert_eq!(again.state, ControllerState::Paused);
        assert_eq!(again.session_id, paused.session_id);

        let resumed = controller.resume().await.unwrap();
        assert_eq!(resumed.state, ControllerState::Playing);
        assert_eq!(resumed.current_index, 1);

        h.wait_calls(3).await;
        let calls = h.fake.calls();
        assert_eq!(calls[1].unit_index, 1);
        assert_eq!(calls[2].unit_index, 1);
        assert!(h.fake.cancelled().contains(&calls[1].session_id));

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_seek_out_of_range_is_rejected() {
        let h = Harness::start(PlayMode::Single);
        h.runtime
            .holder()
            .set_selected_text("Only one.")
            .await
            .unwrap();

        let result = h.runtime.controller().seek(5).await;
        assert!(matches!(result, Err(ApplicationError::InvalidState(_))));

        h.runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_commands_fail_after_shutdown() {
        let h = Harness::start(PlayMode::Single);
        let holder = h.runtime.holder();
        let controller = h.runtime.controller();
        h.runtime.shutdown().await;

        assert!(matches!(
            controller.play().await,
            Err(ApplicationError::ControllerUnavailable)
        ));
        assert!(matches!(
            holder.set_selected_text("late").await,
            Err(ApplicationError::ControllerUnavailable)
        ));
    }
}
