//! Client-side flag cache with optimistic updates.
//!
//! A toggle is shown immediately, sent to the server, and undone from its
//! revert payload if the server does not apply it. The cache is only changed
//! through `&mut self`; each request runs as its own task, so several can be
//! pending at once.

pub mod cache;
pub mod client;
pub mod season_state;
pub mod toggle;
pub mod transport;

pub use cache::ShowCache;
pub use client::{InFlightToggle, SyncClient, ToggleReply};
pub use season_state::{SeasonFlagState, season_flag_state};
pub use toggle::{Notification, PendingToggle, RevertPayload, ToggleState, ToggleTarget};
pub use transport::{FlagTransport, HttpFlagTransport, SyncError};
