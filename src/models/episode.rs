use serde::{Deserialize, Serialize};

use crate::domain::{EpisodeId, FlagSet};

/// Episode metadata as returned by the metadata provider for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInput {
    pub tmdb_id: i32,
    pub season_nb: i32,
    pub episode_nb: i32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
}

/// An episode as seen by one user: metadata plus that user's flags.
///
/// Flags are flattened into `flag_1` .. `flag_8`; slots the user never wrote
/// are `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: EpisodeId,
    pub tmdb_id: i32,
    pub season_nb: i32,
    pub episode_nb: i32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    #[serde(flatten)]
    pub flags: FlagSet,
}
