use crate::config::SecurityConfig;
use crate::domain::{EpisodeId, FlagLabels, FlagSet, ShowId, UserId};
use crate::models::episode::{Episode, EpisodeInput};
use crate::models::show::{Show, ShowInput, ShowSummary};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::User;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    pub fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    // Shows

    pub async fn add_show(&self, show: &ShowInput) -> Result<ShowId> {
        self.show_repo().insert(show).await
    }

    pub async fn update_show(&self, id: ShowId, show: &ShowInput) -> Result<bool> {
        self.show_repo().update(id, show).await
    }

    pub async fn get_show(&self, id: ShowId) -> Result<Option<Show>> {
        self.show_repo().get(id).await
    }

    pub async fn get_show_by_tmdb_id(&self, tmdb_id: i32) -> Result<Option<Show>> {
        self.show_repo().get_by_tmdb_id(tmdb_id).await
    }

    pub async fn list_shows(&self) -> Result<Vec<ShowSummary>> {
        self.show_repo().list_summaries().await
    }

    // Episodes

    pub async fn upsert_episodes(&self, show_id: ShowId, episodes: &[EpisodeInput]) -> Result<()> {
        self.episode_repo().upsert_many(show_id, episodes).await
    }

    pub async fn episode_exists(&self, id: EpisodeId) -> Result<bool> {
        self.episode_repo().exists(id).await
    }

    pub async fn count_episodes(&self, show_id: ShowId) -> Result<u64> {
        self.episode_repo().count_for_show(show_id).await
    }

    pub async fn season_episode_ids(&self, show_id: ShowId, season_nb: i32) -> Result<Vec<EpisodeId>> {
        self.episode_repo()
            .season_episode_ids(show_id, season_nb)
            .await
    }

    pub async fn list_episodes_for_user(
        &self,
        show_id: ShowId,
        user_id: UserId,
    ) -> Result<Vec<Episode>> {
        self.episode_repo().list_for_user(show_id, user_id).await
    }

    pub async fn episode_flags(&self, id: EpisodeId, user_id: UserId) -> Result<FlagSet> {
        self.episode_repo().flags_for_user(id, user_id).await
    }

    // Users

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo().create(username, password, security).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.user_repo().verify_password(username, password).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn set_dark_theme(&self, id: UserId, dark_theme: bool) -> Result<()> {
        self.user_repo().update_dark_theme(id, dark_theme).await
    }

    pub async fn get_flag_labels(&self, id: UserId) -> Result<Option<FlagLabels>> {
        self.user_repo().get_flag_labels(id).await
    }

    pub async fn update_flag_labels(&self, id: UserId, labels: FlagLabels) -> Result<bool> {
        self.user_repo().update_flag_labels(id, labels).await
    }
}
