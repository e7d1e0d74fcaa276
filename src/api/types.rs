use serde::{Deserialize, Serialize};

use crate::domain::FlagLabels;
use crate::models::show::{ShowDetail, ShowSummary};
use crate::services::SessionUser;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    /// Bare `{success}` body used by write endpoints.
    pub const fn outcome(success: bool) -> Self {
        Self {
            success,
            data: None,
            error: None,
        }
    }
}

/// Body of `PATCH /episodes/{id}/flag`.
///
/// The key stays a string here so a bad value is reported as a validation
/// error rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct EpisodeFlagRequest {
    pub flag: String,
    pub value: bool,
}

#[derive(Debug, Deserialize)]
pub struct SeasonFlagRequest {
    pub season_nb: i32,
    pub flag: String,
    pub value: bool,
}

#[derive(Debug, Serialize)]
pub struct ShowListDto {
    pub shows: Vec<ShowSummary>,
    #[serde(rename = "userFlags")]
    pub user_flags: FlagLabels,
}

#[derive(Debug, Serialize)]
pub struct ShowDetailDto {
    pub show: ShowDetail,
}

#[derive(Debug, Deserialize)]
pub struct AddShowRequest {
    pub tmdb_id: i32,
}

#[derive(Debug, Serialize)]
pub struct AddShowResponse {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub user: SessionUser,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    #[serde(rename = "darkTheme")]
    pub dark_theme: bool,
}
