use super::ApiError;
use crate::constants::limits::{MAX_SEARCH_QUERY_LEN, MAX_SEASON_NB};
use crate::domain::{EpisodeId, FlagKey, ShowId};

pub fn validate_show_id(id: i32) -> Result<ShowId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid show ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(ShowId::new(id))
}

pub fn validate_episode_id(id: i32) -> Result<EpisodeId, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid episode ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(EpisodeId::new(id))
}

/// Season 0 holds specials on TMDB, so it is accepted.
pub fn validate_season_nb(season_nb: i32) -> Result<i32, ApiError> {
    if !(0..=MAX_SEASON_NB).contains(&season_nb) {
        return Err(ApiError::validation(format!(
            "Invalid season number: {}. Season must be between 0 and {}",
            season_nb, MAX_SEASON_NB
        )));
    }
    Ok(season_nb)
}

pub fn parse_flag_key(flag: &str) -> Result<FlagKey, ApiError> {
    Ok(flag.parse::<FlagKey>()?)
}

pub fn validate_tmdb_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid TMDB ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Search query cannot be empty"));
    }
    if trimmed.len() > MAX_SEARCH_QUERY_LEN {
        return Err(ApiError::validation(format!(
            "Search query must be {} characters or less",
            MAX_SEARCH_QUERY_LEN
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids() {
        assert_eq!(validate_show_id(1).unwrap(), ShowId::new(1));
        assert!(validate_show_id(0).is_err());
        assert!(validate_show_id(-5).is_err());
        assert_eq!(validate_episode_id(12345).unwrap().value(), 12345);
        assert!(validate_episode_id(0).is_err());
        assert!(validate_tmdb_id(1399).is_ok());
        assert!(validate_tmdb_id(-1).is_err());
    }

    #[test]
    fn test_validate_season_nb() {
        assert!(validate_season_nb(0).is_ok());
        assert!(validate_season_nb(12).is_ok());
        assert!(validate_season_nb(-1).is_err());
        assert!(validate_season_nb(MAX_SEASON_NB + 1).is_err());
    }

    #[test]
    fn test_parse_flag_key() {
        assert_eq!(parse_flag_key("flag_3").unwrap().index(), 3);
        assert!(matches!(
            parse_flag_key("flag_9"),
            Err(ApiError::ValidationError(_))
        ));
        assert!(parse_flag_key("name").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  Dark  ").unwrap(), "Dark");
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
        assert!(validate_search_query(&"a".repeat(MAX_SEARCH_QUERY_LEN + 1)).is_err());
    }
}
