//! Readalong - 选中文本朗读服务
//!
//! 启动顺序: 配置 → 日志 → 合成引擎/分段器 → 播放运行时 → 选区监听 → 全局挂载 → HTTP

use std::sync::Arc;

use readalong::application::ports::{SpeechSynthesizerPort, TextSegmenterPort};
use readalong::config::{load_config, print_config, AppConfig, SegmentationKind, SynthesisEngineKind};
use readalong::domain::SegmentConfig;
use readalong::infrastructure::adapters::{
    FakeSpeechSynthesizer, HttpSpeechClient, HttpSpeechClientConfig, SentenceSegmenter,
    WholeTextSegmenter,
};
use readalong::infrastructure::http::{AppState, HttpServer, ServerConfig};
use readalong::infrastructure::{
    EventPublisher, GlobalControllerMount, InMemorySelectionSource, PlaybackRuntime,
    PlaybackRuntimeConfig, SelectionWatcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Readalong - 选中文本朗读服务");
    print_config(&config);

    let synthesizer = build_synthesizer(&config)?;
    let segmenter = build_segmenter(&config);

    let event_publisher = Arc::new(EventPublisher::new());

    let runtime = PlaybackRuntime::start(
        PlaybackRuntimeConfig {
            default_mode: config.playback.default_mode,
            settings: config.synthesis.speech_settings(),
            mailbox_capacity: config.playback.mailbox_capacity,
        },
        synthesizer,
        segmenter,
        event_publisher.clone(),
    );

    let selection_source = Arc::new(InMemorySelectionSource::new());
    let watcher = SelectionWatcher::mount(selection_source.clone(), runtime.holder());

    let mount = GlobalControllerMount::mount(runtime.holder(), runtime.controller())?;
    let state = Arc::new(AppState::new(mount, selection_source, event_publisher));

    let server = HttpServer::new(
        ServerConfig::new(&config.server.host, config.server.port),
        state,
    );

    let served = server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await;

    // 先卸载监听器，再停止控制器任务
    watcher.unmount().await;
    runtime.shutdown().await;

    served?;
    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},readalong={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn build_synthesizer(config: &AppConfig) -> anyhow::Result<Arc<dyn SpeechSynthesizerPort>> {
    let synthesizer: Arc<dyn SpeechSynthesizerPort> = match config.synthesis.engine {
        SynthesisEngineKind::Http => {
            let client_config = HttpSpeechClientConfig::new(config.synthesis.url.clone())
                .with_timeout(config.synthesis.timeout_secs);
            Arc::new(HttpSpeechClient::new(client_config)?)
        }
        SynthesisEngineKind::Fake => Arc::new(FakeSpeechSynthesizer::with_defaults()),
    };
    Ok(synthesizer)
}

fn build_segmenter(config: &AppConfig) -> Arc<dyn TextSegmenterPort> {
    match config.playback.segmentation {
        SegmentationKind::Sentence => Arc::new(SentenceSegmenter::new(SegmentConfig {
            min_chars: config.playback.min_chars,
        })),
        SegmentationKind::Whole => Arc::new(WholeTextSegmenter),
    }
}
