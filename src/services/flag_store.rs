//! Single-episode flag writes.
//!
//! A flag write is an UPDATE of the user's record for the episode, falling
//! back to an INSERT when no record exists yet. The call reports `true` only
//! when exactly one row was touched.

use crate::domain::{EpisodeId, FlagKey, UserId};
use crate::entities::{prelude::*, user_episode_flags};
use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, QueryFilter, SqlErr,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from the flag write path.
#[derive(Debug, Error)]
pub enum FlagError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<DbErr> for FlagError {
    fn from(err: DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for FlagError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Writes one flag inside a caller-owned transaction.
///
/// The season mutator depends on this seam rather than on [`FlagStore`]
/// directly, so tests can inject a writer that fails on a chosen episode.
#[async_trait]
pub trait FlagWriter: Send + Sync {
    /// Same contract as [`FlagStore::set_flag`], run on `txn`.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Database`] on any storage error other than a
    /// uniqueness conflict, which is reported as `Ok(false)`.
    async fn set_flag_in(
        &self,
        txn: &DatabaseTransaction,
        user_id: UserId,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<bool, FlagError>;
}

#[derive(Clone)]
pub struct FlagStore {
    conn: DatabaseConnection,
}

impl FlagStore {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Sets `key` to `value` on the user's record for `episode_id`, creating
    /// the record on first write.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Database`] when storage fails for a reason other
    /// than a concurrent duplicate insert.
    pub async fn set_flag(
        &self,
        user_id: UserId,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<bool, FlagError> {
        let ok = write(&self.conn, user_id, episode_id, key, value).await?;

        let outcome = if ok { "ok" } else { "rejected" };
        metrics::counter!("flag_updates_total", "scope" => "episode", "outcome" => outcome)
            .increment(1);

        Ok(ok)
    }
}

#[async_trait]
impl FlagWriter for FlagStore {
    async fn set_flag_in(
        &self,
        txn: &DatabaseTransaction,
        user_id: UserId,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<bool, FlagError> {
        write(txn, user_id, episode_id, key, value).await
    }
}

async fn write<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
    episode_id: EpisodeId,
    key: FlagKey,
    value: bool,
) -> Result<bool, FlagError> {
    let column = user_episode_flags::flag_column(key);

    let updated = UserEpisodeFlags::update_many()
        .col_expr(column, Expr::value(value))
        .filter(user_episode_flags::Column::UserId.eq(user_id.value()))
        .filter(user_episode_flags::Column::EpisodeId.eq(episode_id.value()))
        .exec(conn)
        .await?
        .rows_affected;

    if updated == 1 {
        return Ok(true);
    }

    debug!(
        user_id = user_id.value(),
        episode_id = episode_id.value(),
        flag = %key,
        "No flag record yet, inserting"
    );

    let mut record = user_episode_flags::ActiveModel {
        user_id: sea_orm::Set(user_id.value()),
        episode_id: sea_orm::Set(episode_id.value()),
        ..Default::default()
    };
    record.set(column, sea_orm::Value::Bool(Some(value)));

    match UserEpisodeFlags::insert(record)
        .exec_without_returning(conn)
        .await
    {
        Ok(inserted) => Ok(inserted == 1),
        Err(err) => {
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                warn!(
                    user_id = user_id.value(),
                    episode_id = episode_id.value(),
                    flag = %key,
                    "Flag record was created concurrently, write not applied"
                );
                Ok(false)
            } else {
                Err(err.into())
            }
        }
    }
}
