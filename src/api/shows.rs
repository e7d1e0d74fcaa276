use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{
    AddShowRequest, AddShowResponse, ApiError, ApiResponse, AppState, SeasonFlagRequest,
    ShowDetailDto, ShowListDto,
};
use crate::api::validation::{
    parse_flag_key, validate_search_query, validate_season_nb, validate_show_id, validate_tmdb_id,
};
use crate::models::show::ShowSearchResults;
use crate::services::SessionUser;

/// GET /shows
pub async fn list_shows(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<ApiResponse<ShowListDto>>, ApiError> {
    let shows = state.show_service().list_shows().await?;
    let user_flags = state.settings_service().get_flag_labels(user.user_id).await?;

    Ok(Json(ApiResponse::success(ShowListDto { shows, user_flags })))
}

/// GET /shows/{id}
pub async fn get_show(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ShowDetailDto>>, ApiError> {
    let id = validate_show_id(id)?;
    let show = state.show_service().get_show(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(ShowDetailDto { show })))
}

/// GET /shows/search/{query}
pub async fn search_shows(
    State(state): State<Arc<AppState>>,
    Path(query): Path<String>,
) -> Result<Json<ApiResponse<ShowSearchResults>>, ApiError> {
    let query = validate_search_query(&query)?;
    let results = state.show_service().search(query).await?;

    Ok(Json(ApiResponse::success(results)))
}

/// POST /shows
pub async fn add_show(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddShowRequest>,
) -> Result<Json<ApiResponse<AddShowResponse>>, ApiError> {
    let tmdb_id = validate_tmdb_id(payload.tmdb_id)?;
    let id = state.show_service().add_from_provider(tmdb_id).await?;

    Ok(Json(ApiResponse::success(AddShowResponse { id: id.value() })))
}

/// PUT /shows/{id}
/// Refresh metadata and episodes from TMDB
pub async fn refresh_show(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ShowDetailDto>>, ApiError> {
    let id = validate_show_id(id)?;
    let show = state.show_service().refresh(id, user.user_id).await?;

    Ok(Json(ApiResponse::success(ShowDetailDto { show })))
}

/// PATCH /shows/{id}/season/flag
pub async fn set_season_flag(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<i32>,
    Json(payload): Json<SeasonFlagRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let show_id = validate_show_id(id)?;
    let season_nb = validate_season_nb(payload.season_nb)?;
    let key = parse_flag_key(&payload.flag)?;

    let success = state
        .season_flags()
        .set_season_flag(show_id, season_nb, key, payload.value, user.user_id)
        .await?;

    Ok(Json(ApiResponse::outcome(success)))
}
