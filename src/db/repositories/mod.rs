pub mod episode;
pub mod show;
pub mod user;
