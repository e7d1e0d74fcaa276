use crate::clients::MetadataProvider;
use crate::config::TmdbConfig;
use crate::models::episode::EpisodeInput;
use crate::models::show::{ShowInput, ShowSearchHit, ShowSearchResults};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbSearchShow>,
    #[serde(default)]
    total_results: i64,
    #[serde(default)]
    total_pages: i64,
}

#[derive(Debug, Deserialize)]
struct TmdbSearchShow {
    id: i32,
    name: String,
    overview: Option<String>,
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbShow {
    pub id: i32,
    pub name: String,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub in_production: Option<bool>,
    pub number_of_seasons: Option<i32>,
    pub number_of_episodes: Option<i32>,
    #[serde(default)]
    pub origin_country: Vec<String>,
    pub original_language: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub status: Option<String>,
}

impl From<TmdbShow> for ShowInput {
    fn from(show: TmdbShow) -> Self {
        // Only finished shows get an end date.
        let ended = match show.in_production {
            Some(false) => show.last_air_date,
            _ => None,
        };

        Self {
            tmdb_id: show.id,
            name: show.name,
            started: show.first_air_date.filter(|d| !d.is_empty()),
            ended: ended.filter(|d| !d.is_empty()),
            nb_seasons: show.number_of_seasons,
            nb_episodes: show.number_of_episodes,
            origin_country: show.origin_country,
            original_language: show.original_language,
            original_name: show.original_name,
            overview: show.overview,
            image: show.poster_path,
            status: show.status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TmdbSeason {
    #[serde(default)]
    episodes: Vec<TmdbEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbEpisode {
    pub id: i32,
    pub name: Option<String>,
    pub air_date: Option<String>,
    pub season_number: i32,
    pub episode_number: i32,
    pub still_path: Option<String>,
    pub overview: Option<String>,
}

impl From<TmdbEpisode> for EpisodeInput {
    fn from(episode: TmdbEpisode) -> Self {
        Self {
            tmdb_id: episode.id,
            season_nb: episode.season_number,
            episode_nb: episode.episode_number,
            name: episode.name,
            air_date: episode.air_date.filter(|d| !d.is_empty()),
            overview: episode.overview,
            image: episode.still_path,
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(endpoint, "TMDB request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(params)
            .send()
            .await
            .with_context(|| format!("TMDB request failed: {endpoint}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("TMDB API error: {status} - {body}"));
        }

        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("Invalid TMDB response for {endpoint}"))?;

        Ok(Some(body))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbClient {
    async fn search_shows(&self, query: &str) -> Result<ShowSearchResults> {
        let response: Option<SearchResponse> = self
            .get("/search/tv", &[("query", query.to_string()), ("page", "1".to_string())])
            .await?;

        let Some(response) = response.filter(|r| !r.results.is_empty()) else {
            return Ok(ShowSearchResults::default());
        };

        Ok(ShowSearchResults {
            total_results: response.total_results,
            total_pages: response.total_pages,
            shows: response
                .results
                .into_iter()
                .map(|show| ShowSearchHit {
                    id: show.id,
                    tmdb_id: show.id,
                    name: show.name,
                    overview: show.overview,
                    image: show.poster_path,
                })
                .collect(),
        })
    }

    async fn get_show(&self, tmdb_id: i32) -> Result<Option<ShowInput>> {
        let show: Option<TmdbShow> = self.get(&format!("/tv/{tmdb_id}"), &[]).await?;
        Ok(show.map(ShowInput::from))
    }

    async fn get_season(&self, tmdb_id: i32, season_nb: i32) -> Result<Vec<EpisodeInput>> {
        let season: Option<TmdbSeason> = self
            .get(&format!("/tv/{tmdb_id}/season/{season_nb}"), &[])
            .await?;

        Ok(season
            .map(|s| s.episodes.into_iter().map(EpisodeInput::from).collect())
            .unwrap_or_default())
    }
}
