pub mod session {
    /// Session key holding the logged-in [`crate::services::SessionUser`].
    pub const USER_KEY: &str = "user";
}

pub mod accounts {
    /// Length of passwords generated by `add-user` when none is given.
    pub const GENERATED_PASSWORD_LENGTH: usize = 20;
}

pub mod limits {
    pub const MAX_SEARCH_QUERY_LEN: usize = 200;

    /// TMDB has never shown a season number in the thousands.
    pub const MAX_SEASON_NB: i32 = 1000;
}
