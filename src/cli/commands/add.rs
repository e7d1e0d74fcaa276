use std::sync::Arc;

use crate::clients::MetadataProvider;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{SeaOrmShowService, ShowError, ShowService};

pub async fn cmd_add_show(config: &Config, tmdb_id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let provider: Arc<dyn MetadataProvider> = Arc::new(TmdbClient::new(&config.tmdb)?);
    let service = SeaOrmShowService::new(store.clone(), provider, &config.tmdb);

    println!("Fetching TMDB show {tmdb_id}...");

    match service.add_from_provider(tmdb_id).await {
        Ok(id) => {
            let show = store.get_show(id).await?;
            let episodes = store.count_episodes(id).await?;
            let name = show.map_or_else(|| format!("#{id}"), |s| s.name);
            println!("✓ Added: {name} (ID: {id}, {episodes} episodes)");
            Ok(())
        }
        Err(ShowError::AlreadyExists(_)) => {
            println!("Show with TMDB ID {tmdb_id} is already tracked.");
            Ok(())
        }
        Err(ShowError::ProviderNotFound(_)) => {
            println!("No show with TMDB ID {tmdb_id}.");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
