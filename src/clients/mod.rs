pub mod tmdb;

use crate::models::episode::EpisodeInput;
use crate::models::show::{ShowInput, ShowSearchResults};
use anyhow::Result;

/// Source of show and episode metadata.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn search_shows(&self, query: &str) -> Result<ShowSearchResults>;

    /// Returns `None` when the provider does not know the id.
    async fn get_show(&self, tmdb_id: i32) -> Result<Option<ShowInput>>;

    /// Episodes of one season, in provider order.
    async fn get_season(&self, tmdb_id: i32, season_nb: i32) -> Result<Vec<EpisodeInput>>;
}
