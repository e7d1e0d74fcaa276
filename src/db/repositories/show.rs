use crate::domain::ShowId;
use crate::entities::{prelude::*, shows};
use crate::models::show::{Show, ShowInput, ShowSummary};
use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::info;

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: shows::Model) -> Show {
        Show {
            id: model.id,
            tmdb_id: model.tmdb_id,
            name: model.name,
            started: model.started,
            ended: model.ended,
            nb_seasons: model.nb_seasons,
            nb_episodes: model.nb_episodes,
            origin_country: model
                .origin_country
                .and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_default(),
            original_language: model.original_language,
            original_name: model.original_name,
            overview: model.overview,
            image: model.image,
            status: model.status,
        }
    }

    fn to_active(input: &ShowInput) -> shows::ActiveModel {
        shows::ActiveModel {
            tmdb_id: Set(input.tmdb_id),
            name: Set(input.name.clone()),
            started: Set(input.started.clone()),
            ended: Set(input.ended.clone()),
            nb_seasons: Set(input.nb_seasons),
            nb_episodes: Set(input.nb_episodes),
            origin_country: Set(serde_json::to_string(&input.origin_country).ok()),
            original_language: Set(input.original_language.clone()),
            original_name: Set(input.original_name.clone()),
            overview: Set(input.overview.clone()),
            image: Set(input.image.clone()),
            status: Set(input.status.clone()),
            ..Default::default()
        }
    }

    /// Inserts a new show and returns its internal id.
    pub async fn insert(&self, input: &ShowInput) -> anyhow::Result<ShowId> {
        let model = Self::to_active(input)
            .insert(&self.conn)
            .await
            .with_context(|| format!("Failed to insert show tmdb:{}", input.tmdb_id))?;

        info!(show_id = model.id, tmdb_id = model.tmdb_id, "Added show: {}", model.name);
        Ok(ShowId::new(model.id))
    }

    /// Overwrites the metadata of an existing show. Returns false if it is gone.
    pub async fn update(&self, id: ShowId, input: &ShowInput) -> anyhow::Result<bool> {
        let mut active = Self::to_active(input);
        active.id = Set(id.value());

        match active.update(&self.conn).await {
            Ok(_) => Ok(true),
            Err(sea_orm::DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to update show {id}")),
        }
    }

    pub async fn get(&self, id: ShowId) -> anyhow::Result<Option<Show>> {
        let model = Shows::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query show")?;

        Ok(model.map(Self::map_model))
    }

    pub async fn get_by_tmdb_id(&self, tmdb_id: i32) -> anyhow::Result<Option<Show>> {
        let model = Shows::find()
            .filter(shows::Column::TmdbId.eq(tmdb_id))
            .one(&self.conn)
            .await
            .context("Failed to query show by TMDB id")?;

        Ok(model.map(Self::map_model))
    }

    pub async fn list_summaries(&self) -> anyhow::Result<Vec<ShowSummary>> {
        let rows: Vec<(i32, String)> = Shows::find()
            .select_only()
            .column(shows::Column::Id)
            .column(shows::Column::Name)
            .order_by_asc(shows::Column::Name)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to list shows")?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| ShowSummary { id, name })
            .collect())
    }
}
