pub use super::episodes::Entity as Episodes;
pub use super::shows::Entity as Shows;
pub use super::user_episode_flags::Entity as UserEpisodeFlags;
pub use super::users::Entity as Users;
