//! Selection Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::infrastructure::http::dto::{ApiResponse, Empty, ReportSelectionRequest};
use crate::infrastructure::http::state::AppState;

/// 上报当前选区
///
/// 只写入选区来源；监听器随后读取并交给状态持有者
pub async fn report_selection(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportSelectionRequest>,
) -> Json<ApiResponse<Empty>> {
    match req.text {
        Some(text) => {
            tracing::debug!(chars = text.chars().count(), "Selection reported");
            state.selection_source.report(text);
        }
        None => {
            tracing::debug!("Selection cleared");
            state.selection_source.clear();
        }
    }
    Json(ApiResponse::ok())
}
