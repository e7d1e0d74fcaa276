use crate::domain::{EpisodeId, FlagKey, FlagLabels, ShowId};
use crate::models::episode::Episode;
use crate::models::show::ShowDetail;
use crate::optimistic::season_state::{SeasonFlagState, season_flag_state};
use crate::optimistic::toggle::{
    Notification, PendingToggle, RevertPayload, ToggleState, ToggleTarget,
};
use tracing::debug;

/// Local copy of one show's episodes and the user's flags, as displayed.
#[derive(Debug, Clone)]
pub struct ShowCache {
    show_id: ShowId,
    episodes: Vec<Episode>,
    labels: FlagLabels,
    selected_season: i32,
}

impl ShowCache {
    /// Starts on the first season, as the show page does.
    ///
    /// Flags the server reports as unwritten are held as `false`, so every
    /// episode of a season takes part in the season checkbox.
    #[must_use]
    pub fn new(detail: ShowDetail, labels: FlagLabels) -> Self {
        let episodes = detail
            .episodes
            .into_iter()
            .map(|mut ep| {
                ep.flags = ep.flags.unset_as_false();
                ep
            })
            .collect();

        Self {
            show_id: ShowId::new(detail.show.id),
            episodes,
            labels,
            selected_season: 1,
        }
    }

    #[must_use]
    pub const fn show_id(&self) -> ShowId {
        self.show_id
    }

    #[must_use]
    pub const fn selected_season(&self) -> i32 {
        self.selected_season
    }

    pub fn select_season(&mut self, season_nb: i32) {
        self.selected_season = season_nb;
    }

    #[must_use]
    pub fn labels(&self) -> &FlagLabels {
        &self.labels
    }

    #[must_use]
    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    #[must_use]
    pub fn episode(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|ep| ep.id == id)
    }

    pub fn season_episodes(&self, season_nb: i32) -> impl Iterator<Item = &Episode> {
        self.episodes
            .iter()
            .filter(move |ep| ep.season_nb == season_nb)
    }

    /// Checkbox state of `key` for the selected season.
    #[must_use]
    pub fn season_flag_state(&self, key: FlagKey) -> SeasonFlagState {
        season_flag_state(
            self.season_episodes(self.selected_season).map(|ep| &ep.flags),
            key,
        )
    }

    fn set_value(&mut self, id: EpisodeId, key: FlagKey, value: Option<bool>) {
        if let Some(ep) = self.episodes.iter_mut().find(|ep| ep.id == id) {
            ep.flags.set(key, value);
        }
    }

    /// Applies a single-episode toggle locally. Returns `None` if the episode
    /// is not part of this show.
    pub fn begin_episode_toggle(
        &mut self,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Option<PendingToggle> {
        let prior = self.episode(episode_id)?.flags.get(key);
        self.set_value(episode_id, key, Some(value));

        Some(PendingToggle::applied(
            ToggleTarget::Episode(episode_id),
            key,
            value,
            RevertPayload::Episode { episode_id, prior },
        ))
    }

    /// Applies a season toggle locally to every episode of the selected
    /// season whose flag differs from `value`.
    pub fn begin_season_toggle(&mut self, key: FlagKey, value: bool) -> PendingToggle {
        let season_nb = self.selected_season;
        let episode_ids: Vec<EpisodeId> = self
            .season_episodes(season_nb)
            .filter(|ep| ep.flags.get(key) != Some(value))
            .map(|ep| ep.id)
            .collect();

        for id in &episode_ids {
            self.set_value(*id, key, Some(value));
        }

        PendingToggle::applied(
            ToggleTarget::Season {
                show_id: self.show_id,
                season_nb,
            },
            key,
            value,
            RevertPayload::Season {
                episode_ids,
                restore: !value,
            },
        )
    }

    /// Records a successful write. The cache already shows it.
    pub fn confirm(&mut self, toggle: &mut PendingToggle) {
        if toggle.transition(ToggleState::Confirmed) {
            debug!(flag = %toggle.key, "Toggle confirmed");
        }
    }

    /// Undoes a failed toggle from its revert payload and returns the
    /// notification to show. Returns `None` if the toggle was already resolved.
    pub fn revert(&mut self, toggle: &mut PendingToggle) -> Option<Notification> {
        if !toggle.transition(ToggleState::Reverted) {
            return None;
        }

        let key = toggle.key;
        let label = self.labels.display(key).to_string();

        let notification = match &toggle.revert {
            RevertPayload::Episode { episode_id, prior } => {
                self.set_value(*episode_id, key, *prior);
                let name = self.episode(*episode_id).and_then(|ep| ep.name.as_deref());
                Notification::episode_failed(&label, name)
            }
            RevertPayload::Season {
                episode_ids,
                restore,
            } => {
                for id in episode_ids {
                    self.set_value(*id, key, Some(*restore));
                }
                let season_nb = match toggle.target {
                    ToggleTarget::Season { season_nb, .. } => season_nb,
                    ToggleTarget::Episode(_) => self.selected_season,
                };
                Notification::season_failed(&label, season_nb)
            }
        };

        Some(notification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlagSet;
    use crate::models::show::Show;

    fn key(n: u8) -> FlagKey {
        FlagKey::new(n).unwrap()
    }

    fn episode(id: i32, season_nb: i32, flag_1: Option<bool>) -> Episode {
        let mut flags = FlagSet::default();
        flags.set(key(1), flag_1);
        Episode {
            id: EpisodeId::new(id),
            tmdb_id: id * 100,
            season_nb,
            episode_nb: id,
            name: Some(format!("Episode {id}")),
            air_date: None,
            overview: None,
            image: None,
            flags,
        }
    }

    fn cache(episodes: Vec<Episode>) -> ShowCache {
        let show = Show {
            id: 9,
            tmdb_id: 900,
            name: "Test".to_string(),
            started: None,
            ended: None,
            nb_seasons: Some(2),
            nb_episodes: None,
            origin_country: Vec::new(),
            original_language: None,
            original_name: None,
            overview: None,
            image: None,
            status: None,
        };
        let mut labels: [String; 8] = Default::default();
        labels[0] = "Watched".to_string();
        ShowCache::new(ShowDetail { show, episodes }, FlagLabels::new(labels))
    }

    #[test]
    fn unwritten_flags_are_held_as_false() {
        let cache = cache(vec![episode(1, 1, None), episode(2, 1, Some(true))]);
        assert_eq!(cache.episodes()[0].flags.get(key(1)), Some(false));
        assert_eq!(cache.episodes()[0].flags.get(key(5)), Some(false));
        assert_eq!(cache.episodes()[1].flags.get(key(1)), Some(true));
    }

    #[test]
    fn never_flagged_episode_makes_season_indeterminate() {
        let cache = cache(vec![
            episode(1, 1, Some(true)),
            episode(2, 1, None),
            episode(3, 1, None),
            episode(4, 1, None),
        ]);
        assert_eq!(
            cache.season_flag_state(key(1)),
            SeasonFlagState::Indeterminate
        );
    }

    #[test]
    fn untouched_season_is_unchecked() {
        let cache = cache(vec![episode(1, 1, None), episode(2, 1, None)]);
        assert_eq!(cache.season_flag_state(key(1)), SeasonFlagState::Unchecked);
    }

    #[test]
    fn episode_revert_restores_exact_prior_value() {
        let mut cache = cache(vec![episode(1, 1, Some(true))]);
        let mut toggle = cache
            .begin_episode_toggle(EpisodeId::new(1), key(1), false)
            .unwrap();
        assert_eq!(cache.episodes()[0].flags.get(key(1)), Some(false));

        let note = cache.revert(&mut toggle).unwrap();
        assert_eq!(cache.episodes()[0].flags.get(key(1)), Some(true));
        assert_eq!(note.message, "Failed to update Watched for Episode 1");
        assert_eq!(toggle.state(), ToggleState::Reverted);
    }

    #[test]
    fn confirmed_toggle_cannot_be_reverted() {
        let mut cache = cache(vec![episode(1, 1, Some(false))]);
        let mut toggle = cache
            .begin_episode_toggle(EpisodeId::new(1), key(1), true)
            .unwrap();
        cache.confirm(&mut toggle);

        assert!(cache.revert(&mut toggle).is_none());
        assert_eq!(cache.episodes()[0].flags.get(key(1)), Some(true));
    }

    #[test]
    fn unknown_episode_is_not_toggled() {
        let mut cache = cache(vec![episode(1, 1, None)]);
        assert!(
            cache
                .begin_episode_toggle(EpisodeId::new(42), key(1), true)
                .is_none()
        );
    }

    #[test]
    fn season_toggle_touches_only_differing_episodes_of_selected_season() {
        let mut cache = cache(vec![
            episode(1, 1, Some(true)),
            episode(2, 1, None),
            episode(3, 1, Some(false)),
            episode(4, 2, None),
        ]);

        let toggle = cache.begin_season_toggle(key(1), true);
        assert_eq!(
            toggle.revert,
            RevertPayload::Season {
                episode_ids: vec![EpisodeId::new(2), EpisodeId::new(3)],
                restore: false,
            }
        );
        assert_eq!(cache.season_flag_state(key(1)), SeasonFlagState::Checked);
        assert_eq!(cache.episodes()[3].flags.get(key(1)), Some(false));
    }

    #[test]
    fn season_revert_flips_uniformly() {
        let mut cache = cache(vec![
            episode(1, 1, Some(true)),
            episode(2, 1, None),
            episode(3, 1, Some(false)),
        ]);

        let mut toggle = cache.begin_season_toggle(key(1), true);
        let note = cache.revert(&mut toggle).unwrap();

        assert_eq!(note.message, "Failed to update Watched for season 1");
        let values: Vec<_> = cache.episodes().iter().map(|e| e.flags.get(key(1))).collect();
        // Episode 2 was never written, so false is also its prior value.
        assert_eq!(values, vec![Some(true), Some(false), Some(false)]);
    }

    #[test]
    fn unlabelled_flag_uses_key_in_notification() {
        let mut cache = cache(vec![episode(1, 1, None)]);
        cache.select_season(1);
        let mut toggle = cache.begin_season_toggle(key(4), true);
        let note = cache.revert(&mut toggle).unwrap();
        assert_eq!(note.message, "Failed to update flag_4 for season 1");
    }
}
