use axum::{
    Extension, Json,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState, LoginRequest, SessionDto};
use crate::constants::session::USER_KEY;
use crate::services::SessionUser;

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// The resolved [`SessionUser`] is attached to the request extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    // Check session first (fastest path for web UI)
    if let Ok(Some(user)) = session.get::<SessionUser>(USER_KEY).await {
        tracing::Span::current().record("user_id", user.user_id.value());
        request.extensions_mut().insert(user);
        return Ok(next.run(request).await);
    }

    if let Some(key) = extract_api_key(&headers) {
        if let Some(user) = state.auth_service().verify_api_key(&key).await? {
            tracing::Span::current().record("user_id", user.user_id.value());
            request.extensions_mut().insert(user);
            return Ok(next.run(request).await);
        }
    }

    Err(ApiError::Unauthorized("Not authenticated".to_string()))
}

fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session
/// Authenticate with username and password and open a session
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    let user = state
        .auth_service()
        .login(&payload.username, &payload.password)
        .await?;

    session
        .insert(USER_KEY, &user)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::success(SessionDto { user })))
}

/// GET /session
/// The user behind the current session
pub async fn current_session(
    session: Session,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    let user = session_user(&session)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    Ok(Json(ApiResponse::success(SessionDto { user })))
}

/// DELETE /session
pub async fn logout(session: Session) -> Result<Json<ApiResponse<()>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;

    Ok(Json(ApiResponse::outcome(true)))
}

/// PATCH /settings/theme
/// Persist the theme preference and mirror it into the session
pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    session: Session,
    Json(payload): Json<super::ThemeRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .set_dark_theme(user.user_id, payload.dark_theme)
        .await?;

    if session_user(&session).await?.is_some() {
        let updated = SessionUser {
            dark_theme: payload.dark_theme,
            ..user
        };
        session
            .insert(USER_KEY, &updated)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to update session: {e}")))?;
    }

    Ok(Json(ApiResponse::outcome(true)))
}

// ============================================================================
// Helpers
// ============================================================================

async fn session_user(session: &Session) -> Result<Option<SessionUser>, ApiError> {
    session
        .get::<SessionUser>(USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}
