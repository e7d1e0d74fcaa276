use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, EpisodeFlagRequest};
use crate::api::validation::{parse_flag_key, validate_episode_id};
use crate::services::SessionUser;

/// PATCH /episodes/{id}/flag
pub async fn set_episode_flag(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
    Json(payload): Json<EpisodeFlagRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let episode_id = validate_episode_id(id)?;
    let key = parse_flag_key(&payload.flag)?;

    if !state.store().episode_exists(episode_id).await? {
        return Err(ApiError::not_found("Episode", episode_id));
    }

    let success = state
        .flag_store()
        .set_flag(user.user_id, episode_id, key, payload.value)
        .await?;

    tracing::debug!(
        user_id = user.user_id.value(),
        episode_id = id,
        flag = %key,
        value = payload.value,
        success,
        "Episode flag update"
    );

    Ok(Json(ApiResponse::outcome(success)))
}
