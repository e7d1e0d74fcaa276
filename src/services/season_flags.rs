//! Whole-season flag updates.
//!
//! Every episode of the season is written in one transaction, in episode
//! order. The first failed write stops the loop and rolls back everything
//! written before it.

use std::sync::Arc;

use crate::db::Store;
use crate::domain::{FlagKey, ShowId, UserId};
use crate::services::flag_store::{FlagError, FlagWriter};
use sea_orm::TransactionTrait;
use tracing::{info, warn};

pub struct SeasonFlagMutator {
    store: Store,
    writer: Arc<dyn FlagWriter>,
}

impl SeasonFlagMutator {
    #[must_use]
    pub fn new(store: Store, writer: Arc<dyn FlagWriter>) -> Self {
        Self { store, writer }
    }

    /// Sets `key` to `value` on every episode of the season for one user.
    ///
    /// Returns `Ok(false)` after a rollback when any single write is not
    /// applied. A season with no episodes commits nothing and reports success.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError::Database`] on storage failure. The transaction is
    /// rolled back before the error is returned.
    pub async fn set_season_flag(
        &self,
        show_id: ShowId,
        season_nb: i32,
        key: FlagKey,
        value: bool,
        user_id: UserId,
    ) -> Result<bool, FlagError> {
        let episode_ids = self.store.season_episode_ids(show_id, season_nb).await?;

        let txn = self.store.conn.begin().await?;

        for episode_id in &episode_ids {
            let result = self
                .writer
                .set_flag_in(&txn, user_id, *episode_id, key, value)
                .await;

            match result {
                Ok(true) => {}
                Ok(false) => {
                    txn.rollback().await?;
                    warn!(
                        user_id = user_id.value(),
                        show_id = show_id.value(),
                        season_nb,
                        flag = %key,
                        "Season flag update rolled back"
                    );
                    record(false);
                    return Ok(false);
                }
                Err(err) => {
                    txn.rollback().await?;
                    record(false);
                    return Err(err);
                }
            }
        }

        txn.commit().await?;

        info!(
            user_id = user_id.value(),
            show_id = show_id.value(),
            season_nb,
            flag = %key,
            value,
            episodes = episode_ids.len(),
            "Season flag updated"
        );
        record(true);

        Ok(true)
    }
}

fn record(ok: bool) {
    let outcome = if ok { "ok" } else { "rejected" };
    metrics::counter!("flag_updates_total", "scope" => "season", "outcome" => outcome)
        .increment(1);
}
