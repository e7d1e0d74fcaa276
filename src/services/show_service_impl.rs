//! `SeaORM` implementation of the `ShowService` trait.

use std::sync::Arc;
use std::time::Duration;

use crate::clients::MetadataProvider;
use crate::config::TmdbConfig;
use crate::db::Store;
use crate::domain::{ShowId, UserId};
use crate::models::show::{ShowDetail, ShowSearchResults, ShowSummary};
use crate::services::show_service::{ShowError, ShowService};
use async_trait::async_trait;
use tracing::{info, warn};

pub struct SeaOrmShowService {
    store: Store,
    provider: Arc<dyn MetadataProvider>,
    seasons_per_pause: i32,
    pause: Duration,
}

impl SeaOrmShowService {
    #[must_use]
    pub fn new(store: Store, provider: Arc<dyn MetadataProvider>, config: &TmdbConfig) -> Self {
        Self {
            store,
            provider,
            seasons_per_pause: config.seasons_per_pause,
            pause: Duration::from_millis(config.pause_millis),
        }
    }

    /// Fetches seasons 1..=`nb_seasons` one at a time and upserts their
    /// episodes, pausing on every `seasons_per_pause`th season.
    async fn refresh_episodes(
        &self,
        show_id: ShowId,
        tmdb_id: i32,
        nb_seasons: i32,
    ) -> Result<usize, ShowError> {
        let mut total = 0;

        for season_nb in 1..=nb_seasons {
            if self.seasons_per_pause > 0 && season_nb % self.seasons_per_pause == 0 {
                tokio::time::sleep(self.pause).await;
            }

            let episodes = self
                .provider
                .get_season(tmdb_id, season_nb)
                .await
                .map_err(|e| ShowError::provider(&e))?;

            total += episodes.len();
            self.store.upsert_episodes(show_id, &episodes).await?;
        }

        Ok(total)
    }

    async fn load_detail(&self, id: ShowId, user_id: UserId) -> Result<ShowDetail, ShowError> {
        let show = self
            .store
            .get_show(id)
            .await?
            .ok_or(ShowError::NotFound(id))?;

        let episodes = self.store.list_episodes_for_user(id, user_id).await?;

        Ok(ShowDetail { show, episodes })
    }
}

#[async_trait]
impl ShowService for SeaOrmShowService {
    async fn list_shows(&self) -> Result<Vec<ShowSummary>, ShowError> {
        Ok(self.store.list_shows().await?)
    }

    async fn get_show(&self, id: ShowId, user_id: UserId) -> Result<ShowDetail, ShowError> {
        self.load_detail(id, user_id).await
    }

    async fn search(&self, query: &str) -> Result<ShowSearchResults, ShowError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ShowError::Validation("Search query cannot be empty".to_string()));
        }

        self.provider
            .search_shows(query)
            .await
            .map_err(|e| ShowError::provider(&e))
    }

    async fn add_from_provider(&self, tmdb_id: i32) -> Result<ShowId, ShowError> {
        if self.store.get_show_by_tmdb_id(tmdb_id).await?.is_some() {
            return Err(ShowError::AlreadyExists(tmdb_id));
        }

        let input = self
            .provider
            .get_show(tmdb_id)
            .await
            .map_err(|e| ShowError::provider(&e))?
            .ok_or(ShowError::ProviderNotFound(tmdb_id))?;

        let id = self.store.add_show(&input).await?;
        let episodes = self
            .refresh_episodes(id, tmdb_id, input.nb_seasons.unwrap_or(0))
            .await?;

        info!(show_id = id.value(), tmdb_id, episodes, "Show added: {}", input.name);
        Ok(id)
    }

    async fn refresh(&self, id: ShowId, user_id: UserId) -> Result<ShowDetail, ShowError> {
        let show = self
            .store
            .get_show(id)
            .await?
            .ok_or(ShowError::NotFound(id))?;

        let input = self
            .provider
            .get_show(show.tmdb_id)
            .await
            .map_err(|e| ShowError::provider(&e))?
            .ok_or(ShowError::ProviderNotFound(show.tmdb_id))?;

        if !self.store.update_show(id, &input).await? {
            warn!(show_id = id.value(), "Show disappeared during refresh");
            return Err(ShowError::NotFound(id));
        }

        let episodes = self
            .refresh_episodes(id, show.tmdb_id, input.nb_seasons.unwrap_or(0))
            .await?;
        info!(show_id = id.value(), episodes, "Show refreshed: {}", input.name);

        self.load_detail(id, user_id).await
    }
}
