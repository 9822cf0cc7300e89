//! Data Transfer Objects

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::playback::{PlayMode, SettingsUpdate};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Playback DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SeekRequest {
    pub unit_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: PlayMode,
}

/// 只更新提供的字段；`"voice": null` 恢复引擎默认音色
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default, deserialize_with = "present_field")]
    pub voice: Option<Option<String>>,
    #[serde(default)]
    pub rate: Option<f32>,
}

/// 区分字段缺失（None）与显式 null（Some(None)）
fn present_field<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateSettingsRequest> for SettingsUpdate {
    fn from(req: UpdateSettingsRequest) -> Self {
        SettingsUpdate {
            voice: req.voice,
            rate: req.rate,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub engine_healthy: bool,
    pub mounted: bool,
}

// ============================================================================
// Selection DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ReportSelectionRequest {
    /// None 表示选区对象消失
    #[serde(default)]
    pub text: Option<String>,
}
