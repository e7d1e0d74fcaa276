//! `SeaORM` implementation of the `AuthService` trait.

use crate::db::Store;
use crate::domain::UserId;
use crate::services::auth_service::{AuthError, AuthService, SessionUser};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<SessionUser, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let Some(user) = self.store.verify_user_password(username, password).await? else {
            warn!(username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        info!(user_id = user.id.value(), username, "User logged in");
        Ok(SessionUser::from(user))
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<SessionUser>, AuthError> {
        let user = self.store.verify_api_key(api_key).await?;
        Ok(user.map(SessionUser::from))
    }

    async fn get_user(&self, user_id: UserId) -> Result<SessionUser, AuthError> {
        self.store
            .get_user(user_id)
            .await?
            .map(SessionUser::from)
            .ok_or(AuthError::UserNotFound)
    }

    async fn set_dark_theme(&self, user_id: UserId, dark_theme: bool) -> Result<(), AuthError> {
        self.store.set_dark_theme(user_id, dark_theme).await?;
        Ok(())
    }
}
