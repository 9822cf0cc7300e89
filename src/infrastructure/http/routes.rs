//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                  GET   存活检查
//! - /api/playback              GET   当前播放快照
//! - /api/playback/health       GET   合成引擎健康检查
//! - /api/playback/play         POST  播放
//! - /api/playback/pause        POST  暂停
//! - /api/playback/resume       POST  恢复
//! - /api/playback/stop         POST  停止
//! - /api/playback/seek         POST  跳转单元
//! - /api/playback/mode         POST  切换播放模式
//! - /api/playback/settings     POST  更新音色/语速
//! - /api/selection             POST  上报选区
//! - /ws/events                 WS    播放事件推送

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/selection", post(handlers::report_selection))
        .nest("/playback", playback_routes())
}

/// Playback 路由
fn playback_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::get_playback))
        .route("/health", get(handlers::health))
        .route("/play", post(handlers::play))
        .route("/pause", post(handlers::pause))
        .route("/resume", post(handlers::resume))
        .route("/stop", post(handlers::stop))
        .route("/seek", post(handlers::seek))
        .route("/mode", post(handlers::set_mode))
        .route("/settings", post(handlers::update_settings))
}
