//! Domain service for the show library.
//!
//! Shows are copied from the metadata provider into the local database, then
//! read back with each user's episode flags attached.

use crate::domain::{ShowId, UserId};
use crate::models::show::{ShowDetail, ShowSearchResults, ShowSummary};
use thiserror::Error;

/// Domain errors for show operations.
#[derive(Debug, Error)]
pub enum ShowError {
    #[error("Show {0} not found")]
    NotFound(ShowId),

    #[error("Show {0} not found at the metadata provider")]
    ProviderNotFound(i32),

    #[error("Show {0} is already in the library")]
    AlreadyExists(i32),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("External API error: {service} - {message}")]
    ExternalApi { service: String, message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for ShowError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for ShowError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl ShowError {
    pub(crate) fn provider(err: &anyhow::Error) -> Self {
        Self::ExternalApi {
            service: "TMDB".to_string(),
            message: format!("{err:#}"),
        }
    }
}

#[async_trait::async_trait]
pub trait ShowService: Send + Sync {
    /// All shows in the library, ordered by name.
    async fn list_shows(&self) -> Result<Vec<ShowSummary>, ShowError>;

    /// A show with every episode annotated with the user's flags.
    ///
    /// # Errors
    ///
    /// Returns [`ShowError::NotFound`] if the show is not in the library.
    async fn get_show(&self, id: ShowId, user_id: UserId) -> Result<ShowDetail, ShowError>;

    async fn search(&self, query: &str) -> Result<ShowSearchResults, ShowError>;

    /// Copies a show and all of its seasons from the provider.
    ///
    /// # Errors
    ///
    /// - Returns [`ShowError::AlreadyExists`] if the show was added before
    /// - Returns [`ShowError::ProviderNotFound`] if the provider does not know it
    async fn add_from_provider(&self, tmdb_id: i32) -> Result<ShowId, ShowError>;

    /// Re-fetches show metadata and episodes, then returns the fresh detail.
    async fn refresh(&self, id: ShowId, user_id: UserId) -> Result<ShowDetail, ShowError>;
}
