use crate::db::Store;
use crate::domain::{FlagLabels, UserId};
use crate::services::settings_service::{SettingsError, SettingsService};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmSettingsService {
    store: Store,
}

impl SeaOrmSettingsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SettingsService for SeaOrmSettingsService {
    async fn get_flag_labels(&self, user_id: UserId) -> Result<FlagLabels, SettingsError> {
        self.store
            .get_flag_labels(user_id)
            .await?
            .ok_or(SettingsError::UserNotFound(user_id))
    }

    async fn update_flag_labels(
        &self,
        user_id: UserId,
        labels: FlagLabels,
    ) -> Result<(), SettingsError> {
        if !self.store.update_flag_labels(user_id, labels).await? {
            return Err(SettingsError::UserNotFound(user_id));
        }

        info!(user_id = user_id.value(), "Flag labels updated");
        Ok(())
    }
}
