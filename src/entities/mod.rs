pub mod prelude;

pub mod episodes;
pub mod shows;
pub mod user_episode_flags;
pub mod users;
