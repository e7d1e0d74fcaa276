//! Domain service for authentication.
//!
//! Handles login by password and lookup by API key.

use crate::db::User;
use crate::domain::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// The identity stored in a session and attached to authenticated requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "darkTheme")]
    pub dark_theme: bool,
}

impl From<User> for SessionUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            dark_theme: user.dark_theme,
        }
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the session identity.
    ///
    /// # Errors
    ///
    /// - Returns [`AuthError::Validation`] if either field is empty
    /// - Returns [`AuthError::InvalidCredentials`] if login fails
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError>;

    /// Verifies an API key and returns its owner if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<SessionUser>, AuthError>;

    /// Current state of a user, for refreshing a session.
    async fn get_user(&self, user_id: UserId) -> Result<SessionUser, AuthError>;

    async fn set_dark_theme(&self, user_id: UserId, dark_theme: bool) -> Result<(), AuthError>;
}
