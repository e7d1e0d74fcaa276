use crate::domain::{EpisodeId, FlagSet, ShowId, UserId};
use crate::entities::{episodes, prelude::*, user_episode_flags};
use crate::models::episode::{Episode, EpisodeInput};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;

/// Repository for episode metadata and the per-user flags attached to it
pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: episodes::Model, flags: FlagSet) -> Episode {
        Episode {
            id: EpisodeId::new(model.id),
            tmdb_id: model.tmdb_id,
            season_nb: model.season_nb,
            episode_nb: model.episode_nb,
            name: model.name,
            air_date: model.air_date,
            overview: model.overview,
            image: model.image,
            flags,
        }
    }

    /// Inserts or refreshes episodes keyed by (show, season, episode number).
    pub async fn upsert_many(&self, show_id: ShowId, episodes: &[EpisodeInput]) -> Result<()> {
        if episodes.is_empty() {
            return Ok(());
        }

        let active_models: Vec<episodes::ActiveModel> = episodes
            .iter()
            .map(|episode| episodes::ActiveModel {
                tmdb_id: Set(episode.tmdb_id),
                show_id: Set(show_id.value()),
                season_nb: Set(episode.season_nb),
                episode_nb: Set(episode.episode_nb),
                name: Set(episode.name.clone()),
                air_date: Set(episode.air_date.clone()),
                overview: Set(episode.overview.clone()),
                image: Set(episode.image.clone()),
                ..Default::default()
            })
            .collect();

        Episodes::insert_many(active_models)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    episodes::Column::ShowId,
                    episodes::Column::SeasonNb,
                    episodes::Column::EpisodeNb,
                ])
                .update_columns([
                    episodes::Column::TmdbId,
                    episodes::Column::Name,
                    episodes::Column::AirDate,
                    episodes::Column::Overview,
                    episodes::Column::Image,
                ])
                .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn exists(&self, id: EpisodeId) -> Result<bool> {
        let count = Episodes::find_by_id(id.value()).count(&self.conn).await?;
        Ok(count > 0)
    }

    pub async fn count_for_show(&self, show_id: ShowId) -> Result<u64> {
        let count = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id.value()))
            .count(&self.conn)
            .await?;
        Ok(count)
    }

    /// Ids of every episode in one season, in episode order.
    pub async fn season_episode_ids(&self, show_id: ShowId, season_nb: i32) -> Result<Vec<EpisodeId>> {
        let ids: Vec<i32> = Episodes::find()
            .select_only()
            .column(episodes::Column::Id)
            .filter(episodes::Column::ShowId.eq(show_id.value()))
            .filter(episodes::Column::SeasonNb.eq(season_nb))
            .order_by_asc(episodes::Column::EpisodeNb)
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(ids.into_iter().map(EpisodeId::new).collect())
    }

    /// All episodes of a show annotated with one user's flags.
    /// Episodes the user never flagged come back with every flag unset.
    pub async fn list_for_user(&self, show_id: ShowId, user_id: UserId) -> Result<Vec<Episode>> {
        let rows = Episodes::find()
            .filter(episodes::Column::ShowId.eq(show_id.value()))
            .order_by_asc(episodes::Column::SeasonNb)
            .order_by_asc(episodes::Column::EpisodeNb)
            .all(&self.conn)
            .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let flags: HashMap<i32, FlagSet> = UserEpisodeFlags::find()
            .filter(user_episode_flags::Column::UserId.eq(user_id.value()))
            .filter(user_episode_flags::Column::EpisodeId.is_in(ids))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|row| (row.episode_id, row.flags()))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let set = flags.get(&row.id).copied().unwrap_or_default();
                Self::map_model(row, set)
            })
            .collect())
    }

    pub async fn flags_for_user(&self, id: EpisodeId, user_id: UserId) -> Result<FlagSet> {
        let row = UserEpisodeFlags::find_by_id((user_id.value(), id.value()))
            .one(&self.conn)
            .await?;

        Ok(row.map(|r| r.flags()).unwrap_or_default())
    }
}
