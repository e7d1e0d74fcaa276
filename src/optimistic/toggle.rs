//! Lifecycle of a single optimistic toggle.
//!
//! A toggle is created in [`ToggleState::AppliedLocally`] with its revert
//! payload already captured. It ends in exactly one of `Confirmed` or
//! `Reverted`; resolving it a second time has no effect.

use crate::domain::{EpisodeId, FlagKey, ShowId};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    AppliedLocally,
    Confirmed,
    Reverted,
}

impl ToggleState {
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        !matches!(self, Self::AppliedLocally)
    }
}

/// What the toggle was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleTarget {
    Episode(EpisodeId),
    Season { show_id: ShowId, season_nb: i32 },
}

/// How to undo the local change, computed when the toggle was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertPayload {
    /// Restore the exact value the episode held before.
    Episode {
        episode_id: EpisodeId,
        prior: Option<bool>,
    },
    /// Set every listed episode to `restore`. The season checkbox only offers
    /// one prior value, so episodes are not restored individually.
    Season {
        episode_ids: Vec<EpisodeId>,
        restore: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub target: ToggleTarget,
    pub key: FlagKey,
    pub value: bool,
    pub revert: RevertPayload,
    state: ToggleState,
}

impl PendingToggle {
    pub(crate) const fn applied(
        target: ToggleTarget,
        key: FlagKey,
        value: bool,
        revert: RevertPayload,
    ) -> Self {
        Self {
            target,
            key,
            value,
            revert,
            state: ToggleState::AppliedLocally,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ToggleState {
        self.state
    }

    /// Moves to `next` if still unresolved. Returns whether it moved.
    pub(crate) fn transition(&mut self, next: ToggleState) -> bool {
        if self.state.is_resolved() {
            return false;
        }
        self.state = next;
        true
    }
}

/// User-facing failure message raised when a toggle is reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    pub(crate) fn episode_failed(label: &str, episode_name: Option<&str>) -> Self {
        let name = episode_name.filter(|n| !n.is_empty()).unwrap_or("Episode");
        Self {
            message: format!("Failed to update {label} for {name}"),
        }
    }

    pub(crate) fn season_failed(label: &str, season_nb: i32) -> Self {
        Self {
            message: format!("Failed to update {label} for season {season_nb}"),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_only_once() {
        let mut toggle = PendingToggle::applied(
            ToggleTarget::Episode(EpisodeId::new(1)),
            FlagKey::new(1).unwrap(),
            true,
            RevertPayload::Episode {
                episode_id: EpisodeId::new(1),
                prior: None,
            },
        );

        assert_eq!(toggle.state(), ToggleState::AppliedLocally);
        assert!(toggle.transition(ToggleState::Confirmed));
        assert!(!toggle.transition(ToggleState::Reverted));
        assert_eq!(toggle.state(), ToggleState::Confirmed);
    }

    #[test]
    fn notification_falls_back_to_generic_episode_name() {
        assert_eq!(
            Notification::episode_failed("Watched", None).message,
            "Failed to update Watched for Episode"
        );
        assert_eq!(
            Notification::episode_failed("flag_3", Some("Pilot")).message,
            "Failed to update flag_3 for Pilot"
        );
        assert_eq!(
            Notification::season_failed("Watched", 2).to_string(),
            "Failed to update Watched for season 2"
        );
    }
}
