//! Playback Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::playback::PlaybackSnapshot;
use crate::infrastructure::http::dto::{
    ApiResponse, HealthResponse, SeekRequest, SetModeRequest, UpdateSettingsRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

type SnapshotResponse = Result<Json<ApiResponse<PlaybackSnapshot>>, ApiError>;

/// 当前播放快照
pub async fn get_playback(State(state): State<Arc<AppState>>) -> Json<ApiResponse<PlaybackSnapshot>> {
    Json(ApiResponse::success(state.mount.view()))
}

/// 合成引擎健康检查
pub async fn health(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthResponse>> {
    let engine_healthy = state.mount.engine_healthy().await;
    if !engine_healthy {
        tracing::warn!("Speech synthesis engine health check failed");
    }
    Json(ApiResponse::success(HealthResponse {
        engine_healthy,
        mounted: state.mount.holder().is_mounted(),
    }))
}

pub async fn play(State(state): State<Arc<AppState>>) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(state.mount.play().await?)))
}

pub async fn pause(State(state): State<Arc<AppState>>) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(state.mount.pause().await?)))
}

pub async fn resume(State(state): State<Arc<AppState>>) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(state.mount.resume().await?)))
}

pub async fn stop(State(state): State<Arc<AppState>>) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(state.mount.stop().await?)))
}

pub async fn seek(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeekRequest>,
) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(
        state.mount.seek(req.unit_index).await?,
    )))
}

pub async fn set_mode(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SetModeRequest>,
) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(state.mount.set_mode(req.mode).await?)))
}

/// 局部更新由控制器合并与校验
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateSettingsRequest>,
) -> SnapshotResponse {
    Ok(Json(ApiResponse::success(
        state.mount.update_settings(req.into()).await?,
    )))
}
