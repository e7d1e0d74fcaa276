//! Domain types for the flag-tracking subsystem with strong typing.
//!
//! Ids are newtypes so a show id can never be passed where an episode id is
//! expected. Flags are a fixed set of eight slots addressed by [`FlagKey`].

pub mod flags;

pub use flags::{FlagKey, FlagKeyError, FlagLabels, FlagSet, FLAG_COUNT};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            #[must_use]
            pub const fn value(&self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self::new(id)
            }
        }
    };
}

entity_id!(
    /// Internal identifier of a show (not the TMDB id).
    ShowId
);

entity_id!(
    /// Internal identifier of an episode (not the TMDB id).
    EpisodeId
);

entity_id!(
    /// Identifier of an authenticated user.
    UserId
);
