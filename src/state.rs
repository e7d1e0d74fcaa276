use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::MetadataProvider;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, FlagStore, SeaOrmAuthService, SeaOrmSettingsService, SeaOrmShowService,
    SeasonFlagMutator, SettingsService, ShowService,
};

/// Everything request handlers and CLI commands share, built once at startup.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub flag_store: Arc<FlagStore>,

    pub season_flags: Arc<SeasonFlagMutator>,

    pub provider: Arc<dyn MetadataProvider>,

    pub show_service: Arc<dyn ShowService>,

    pub auth_service: Arc<dyn AuthService>,

    pub settings_service: Arc<dyn SettingsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbClient::new(&config.tmdb)?);
        Self::with_provider(config, provider).await
    }

    /// Builds the state around a caller-supplied metadata provider.
    pub async fn with_provider(
        config: Config,
        provider: Arc<dyn MetadataProvider>,
    ) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let flag_store = Arc::new(FlagStore::new(store.conn.clone()));
        let season_flags = Arc::new(SeasonFlagMutator::new(store.clone(), flag_store.clone()));

        let show_service: Arc<dyn ShowService> = Arc::new(SeaOrmShowService::new(
            store.clone(),
            provider.clone(),
            &config.tmdb,
        ));
        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));
        let settings_service: Arc<dyn SettingsService> =
            Arc::new(SeaOrmSettingsService::new(store.clone()));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            flag_store,
            season_flags,
            provider,
            show_service,
            auth_service,
            settings_service,
        })
    }
}
