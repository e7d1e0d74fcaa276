use std::sync::Arc;

use crate::domain::{EpisodeId, FlagKey};
use crate::optimistic::cache::ShowCache;
use crate::optimistic::toggle::{Notification, PendingToggle, ToggleState, ToggleTarget};
use crate::optimistic::transport::{FlagTransport, SyncError};
use tokio::task::JoinHandle;
use tracing::warn;

/// A toggle shown locally whose request is already on the wire.
///
/// The request runs on its own task, so the client stays free to start more
/// toggles. Dropping this leaves the local change in place unresolved.
pub struct InFlightToggle {
    toggle: PendingToggle,
    request: JoinHandle<Result<(), SyncError>>,
}

impl InFlightToggle {
    #[must_use]
    pub const fn toggle(&self) -> &PendingToggle {
        &self.toggle
    }

    /// Waits for the server's answer. Does not touch the cache.
    pub async fn finish(self) -> ToggleReply {
        let result = match self.request.await {
            Ok(result) => result,
            Err(err) => Err(SyncError::Transport(format!("Request task failed: {err}"))),
        };

        ToggleReply {
            toggle: self.toggle,
            result,
        }
    }
}

/// The server's answer to one toggle, ready to be applied to the cache.
pub struct ToggleReply {
    toggle: PendingToggle,
    result: Result<(), SyncError>,
}

impl ToggleReply {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Drives toggles through the cache and the transport.
///
/// Each toggle is sent as soon as it is applied. Nothing is queued or
/// merged, so when responses race the last one resolved wins.
pub struct SyncClient<T: FlagTransport + 'static> {
    transport: Arc<T>,
    cache: ShowCache,
    notifications: Vec<Notification>,
}

impl<T: FlagTransport + 'static> SyncClient<T> {
    pub fn new(transport: T, cache: ShowCache) -> Self {
        Self {
            transport: Arc::new(transport),
            cache,
            notifications: Vec::new(),
        }
    }

    pub const fn cache(&self) -> &ShowCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ShowCache {
        &mut self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Failure messages raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Applies an episode toggle and sends it. Returns `None` when the
    /// episode is not in the cached show.
    pub fn begin_episode_toggle(
        &mut self,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Option<InFlightToggle> {
        let toggle = self.cache.begin_episode_toggle(episode_id, key, value)?;
        Some(self.dispatch(toggle))
    }

    /// Applies a toggle of `key` over the selected season and sends it.
    pub fn begin_season_toggle(&mut self, key: FlagKey, value: bool) -> InFlightToggle {
        let toggle = self.cache.begin_season_toggle(key, value);
        self.dispatch(toggle)
    }

    /// Confirms or reverts the toggle behind `reply`.
    pub fn resolve(&mut self, reply: ToggleReply) -> ToggleState {
        let ToggleReply { mut toggle, result } = reply;

        match result {
            Ok(()) => self.cache.confirm(&mut toggle),
            Err(err) => {
                warn!(flag = %toggle.key, error = %err, "Flag update failed, reverting");
                if let Some(notification) = self.cache.revert(&mut toggle) {
                    self.notifications.push(notification);
                }
            }
        }

        toggle.state()
    }

    /// Applies, sends and resolves one episode toggle.
    pub async fn toggle_episode_flag(
        &mut self,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Option<ToggleState> {
        let in_flight = self.begin_episode_toggle(episode_id, key, value)?;
        let reply = in_flight.finish().await;
        Some(self.resolve(reply))
    }

    /// Applies, sends and resolves one season toggle.
    pub async fn toggle_season_flag(&mut self, key: FlagKey, value: bool) -> ToggleState {
        let reply = self.begin_season_toggle(key, value).finish().await;
        self.resolve(reply)
    }

    fn dispatch(&self, toggle: PendingToggle) -> InFlightToggle {
        let transport = Arc::clone(&self.transport);
        let target = toggle.target.clone();
        let (key, value) = (toggle.key, toggle.value);

        let request = tokio::spawn(async move {
            match target {
                ToggleTarget::Episode(episode_id) => {
                    transport.set_episode_flag(episode_id, key, value).await
                }
                ToggleTarget::Season { show_id, season_nb } => {
                    transport
                        .set_season_flag(show_id, season_nb, key, value)
                        .await
                }
            }
        });

        InFlightToggle { toggle, request }
    }
}
