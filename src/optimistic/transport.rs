use crate::domain::{EpisodeId, FlagKey, ShowId};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded with status {0}")]
    Status(u16),

    #[error("Server did not apply the update")]
    Rejected,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<anyhow::Error> for SyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::Transport(format!("{err:#}"))
    }
}

/// Sends flag writes to the server. `Ok(())` means the write was applied.
#[async_trait]
pub trait FlagTransport: Send + Sync {
    async fn set_episode_flag(
        &self,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<(), SyncError>;

    async fn set_season_flag(
        &self,
        show_id: ShowId,
        season_nb: i32,
        key: FlagKey,
        value: bool,
    ) -> Result<(), SyncError>;
}

#[derive(Serialize)]
struct EpisodeFlagBody {
    flag: FlagKey,
    value: bool,
}

#[derive(Serialize)]
struct SeasonFlagBody {
    season_nb: i32,
    flag: FlagKey,
    value: bool,
}

#[derive(Deserialize)]
struct FlagResponse {
    success: bool,
}

/// [`FlagTransport`] over the HTTP API, authenticated by session cookie or
/// API key.
#[derive(Clone)]
pub struct HttpFlagTransport {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpFlagTransport {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Opens a session; the cookie is kept for later requests.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .post(format!("{}/api/session", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    async fn patch<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), SyncError> {
        let mut request = self
            .client
            .patch(format!("{}{}", self.base_url, path))
            .json(body);

        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(SyncError::Status(response.status().as_u16()));
        }

        let body: FlagResponse = response.json().await?;
        if body.success {
            Ok(())
        } else {
            Err(SyncError::Rejected)
        }
    }
}

#[async_trait]
impl FlagTransport for HttpFlagTransport {
    async fn set_episode_flag(
        &self,
        episode_id: EpisodeId,
        key: FlagKey,
        value: bool,
    ) -> Result<(), SyncError> {
        self.patch(
            &format!("/api/episodes/{episode_id}/flag"),
            &EpisodeFlagBody { flag: key, value },
        )
        .await
    }

    async fn set_season_flag(
        &self,
        show_id: ShowId,
        season_nb: i32,
        key: FlagKey,
        value: bool,
    ) -> Result<(), SyncError> {
        self.patch(
            &format!("/api/shows/{show_id}/season/flag"),
            &SeasonFlagBody {
                season_nb,
                flag: key,
                value,
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_bodies_match_the_api() {
        let key = FlagKey::new(4).unwrap();

        let episode = serde_json::to_value(EpisodeFlagBody { flag: key, value: true }).unwrap();
        assert_eq!(episode, serde_json::json!({"flag": "flag_4", "value": true}));

        let season = serde_json::to_value(SeasonFlagBody {
            season_nb: 2,
            flag: key,
            value: false,
        })
        .unwrap();
        assert_eq!(
            season,
            serde_json::json!({"season_nb": 2, "flag": "flag_4", "value": false})
        );
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let transport = HttpFlagTransport::new("http://localhost:3000/")
            .unwrap()
            .with_api_key("abc");
        assert_eq!(transport.base_url, "http://localhost:3000");
        assert_eq!(transport.api_key.as_deref(), Some("abc"));
    }
}
