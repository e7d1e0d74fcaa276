use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseTransaction};
use showmark::config::SecurityConfig;
use showmark::db::Store;
use showmark::domain::{EpisodeId, FlagKey, FlagSet, ShowId, UserId};
use showmark::models::episode::EpisodeInput;
use showmark::models::show::ShowInput;
use showmark::services::{FlagError, FlagStore, FlagWriter, SeasonFlagMutator};

fn temp_db_url() -> String {
    let path = std::env::temp_dir().join(format!("showmark-test-{}.db", uuid::Uuid::new_v4()));
    format!("sqlite:{}", path.display())
}

fn key(n: u8) -> FlagKey {
    FlagKey::new(n).unwrap()
}

struct Fixture {
    store: Store,
    flags: Arc<FlagStore>,
    user_id: UserId,
    show_id: ShowId,
    season_one: Vec<EpisodeId>,
}

/// One show with five episodes in season 1 and two in season 2.
async fn setup() -> Fixture {
    let store = Store::new(&temp_db_url()).await.unwrap();
    let security = SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    };
    let user = store.create_user("alice", "password", &security).await.unwrap();

    let show_id = store
        .add_show(&ShowInput {
            tmdb_id: 1396,
            name: "Season Show".to_string(),
            nb_seasons: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();

    let episodes: Vec<EpisodeInput> = [(1, 1), (1, 2), (1, 3), (1, 4), (1, 5), (2, 1), (2, 2)]
        .into_iter()
        .enumerate()
        .map(|(i, (season_nb, episode_nb))| EpisodeInput {
            tmdb_id: 100 + i32::try_from(i).unwrap(),
            season_nb,
            episode_nb,
            name: Some(format!("S{season_nb}E{episode_nb}")),
            ..Default::default()
        })
        .collect();
    store.upsert_episodes(show_id, &episodes).await.unwrap();

    let season_one = store.season_episode_ids(show_id, 1).await.unwrap();
    assert_eq!(season_one.len(), 5);

    let flags = Arc::new(FlagStore::new(store.conn.clone()));

    Fixture {
        store,
        flags,
        user_id: user.id,
        show_id,
        season_one,
    }
}

async fn snapshot(store: &Store, ids: &[EpisodeId], user_id: UserId) -> Vec<FlagSet> {
    let mut out = Vec::new();
    for id in ids {
        out.push(store.episode_flags(*id, user_id).await.unwrap());
    }
    out
}

/// Delegates to the real store but refuses one chosen episode.
struct FailingWriter {
    inner: Arc<FlagStore>,
    fail_on: EpisodeId,
}

#[async_trait]
impl FlagWriter for FailingWriter {
    async fn set_flag_in(
        &self,
        txn: &DatabaseTransaction,
        user_id: UserId,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<bool, FlagError> {
        if episode_id == self.fail_on {
            return Ok(false);
        }
        self.inner
            .set_flag_in(txn, user_id, episode_id, key, value)
            .await
    }
}

#[tokio::test]
async fn season_update_sets_every_episode() {
    let f = setup().await;
    let mutator = SeasonFlagMutator::new(f.store.clone(), f.flags.clone());

    let ok = mutator
        .set_season_flag(f.show_id, 1, key(1), true, f.user_id)
        .await
        .unwrap();
    assert!(ok);

    for flags in snapshot(&f.store, &f.season_one, f.user_id).await {
        assert_eq!(flags.get(key(1)), Some(true));
    }

    let season_two = f.store.season_episode_ids(f.show_id, 2).await.unwrap();
    for flags in snapshot(&f.store, &season_two, f.user_id).await {
        assert_eq!(flags.get(key(1)), None);
    }
}

#[tokio::test]
async fn failed_write_rolls_back_the_whole_season() {
    let f = setup().await;

    // Give two episodes existing state so the rollback has something to keep.
    assert!(f.flags.set_flag(f.user_id, f.season_one[0], key(2), false).await.unwrap());
    assert!(f.flags.set_flag(f.user_id, f.season_one[3], key(2), true).await.unwrap());
    let before = snapshot(&f.store, &f.season_one, f.user_id).await;

    let writer = Arc::new(FailingWriter {
        inner: f.flags.clone(),
        fail_on: f.season_one[2],
    });
    let mutator = SeasonFlagMutator::new(f.store.clone(), writer);

    let ok = mutator
        .set_season_flag(f.show_id, 1, key(2), true, f.user_id)
        .await
        .unwrap();
    assert!(!ok);

    let after = snapshot(&f.store, &f.season_one, f.user_id).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn ignored_insert_rolls_back_the_whole_season() {
    let f = setup().await;
    let before = snapshot(&f.store, &f.season_one, f.user_id).await;

    f.store
        .conn
        .execute_unprepared(&format!(
            "CREATE TRIGGER skip_third BEFORE INSERT ON user_episode_flags \
             WHEN NEW.episode_id = {} BEGIN SELECT RAISE(IGNORE); END;",
            f.season_one[2]
        ))
        .await
        .unwrap();

    let mutator = SeasonFlagMutator::new(f.store.clone(), f.flags.clone());
    let ok = mutator
        .set_season_flag(f.show_id, 1, key(1), true, f.user_id)
        .await
        .unwrap();
    assert!(!ok);

    let after = snapshot(&f.store, &f.season_one, f.user_id).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn storage_error_rolls_back_and_propagates() {
    let f = setup().await;
    let before = snapshot(&f.store, &f.season_one, f.user_id).await;

    f.store
        .conn
        .execute_unprepared(&format!(
            "CREATE TRIGGER abort_third BEFORE INSERT ON user_episode_flags \
             WHEN NEW.episode_id = {} BEGIN SELECT RAISE(ABORT, 'forced'); END;",
            f.season_one[2]
        ))
        .await
        .unwrap();

    let mutator = SeasonFlagMutator::new(f.store.clone(), f.flags.clone());
    let result = mutator
        .set_season_flag(f.show_id, 1, key(1), true, f.user_id)
        .await;
    assert!(matches!(result, Err(FlagError::Database(_))));

    let after = snapshot(&f.store, &f.season_one, f.user_id).await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn empty_season_succeeds_without_writes() {
    let f = setup().await;
    let mutator = SeasonFlagMutator::new(f.store.clone(), f.flags.clone());

    let ok = mutator
        .set_season_flag(f.show_id, 9, key(1), true, f.user_id)
        .await
        .unwrap();
    assert!(ok);

    for flags in snapshot(&f.store, &f.season_one, f.user_id).await {
        assert_eq!(flags, FlagSet::default());
    }
}
