//! Per-user flag labels.

use crate::domain::{FlagLabels, UserId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for SettingsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SettingsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait SettingsService: Send + Sync {
    async fn get_flag_labels(&self, user_id: UserId) -> Result<FlagLabels, SettingsError>;

    /// Replaces all eight labels at once.
    async fn update_flag_labels(
        &self,
        user_id: UserId,
        labels: FlagLabels,
    ) -> Result<(), SettingsError>;
}
