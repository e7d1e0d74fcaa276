use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::domain::FlagLabels;
use crate::services::SessionUser;

/// GET /settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<FlagLabels>>, ApiError> {
    let labels = state.settings_service().get_flag_labels(user.user_id).await?;
    Ok(Json(ApiResponse::success(labels)))
}

/// PATCH /settings
/// All eight labels are required
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Json(labels): Json<FlagLabels>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .settings_service()
        .update_flag_labels(user.user_id, labels)
        .await?;

    Ok(Json(ApiResponse::outcome(true)))
}
