use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        // Episode upserts on refresh key off this triple.
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_episodes_show_season_episode ON episodes(show_id, season_nb, episode_nb)",
        )
        .await?;

        conn.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_user_episode_flags_episode ON user_episode_flags(episode_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        conn.execute_unprepared("DROP INDEX IF EXISTS idx_user_episode_flags_episode")
            .await?;
        conn.execute_unprepared("DROP INDEX IF EXISTS idx_episodes_show_season_episode")
            .await?;

        Ok(())
    }
}
