use serde::{Deserialize, Serialize};

use super::episode::Episode;

/// A show as stored locally, keyed by its internal id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    pub id: i32,
    pub tmdb_id: i32,
    pub name: String,
    pub started: Option<String>,
    pub ended: Option<String>,
    pub nb_seasons: Option<i32>,
    pub nb_episodes: Option<i32>,
    pub origin_country: Vec<String>,
    pub original_language: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

/// Entry in the library list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub id: i32,
    pub name: String,
}

/// A show together with its episodes, annotated with one user's flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowDetail {
    #[serde(flatten)]
    pub show: Show,
    pub episodes: Vec<Episode>,
}

/// Show metadata as returned by the metadata provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowInput {
    pub tmdb_id: i32,
    pub name: String,
    pub started: Option<String>,
    pub ended: Option<String>,
    pub nb_seasons: Option<i32>,
    pub nb_episodes: Option<i32>,
    pub origin_country: Vec<String>,
    pub original_language: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub image: Option<String>,
    pub status: Option<String>,
}

/// One provider search hit. `id` mirrors `tmdb_id` for the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSearchHit {
    pub id: i32,
    pub tmdb_id: i32,
    pub name: String,
    pub overview: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSearchResults {
    pub total_results: i64,
    pub total_pages: i64,
    pub shows: Vec<ShowSearchHit>,
}
