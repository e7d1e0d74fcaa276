mod add;
mod add_user;
mod init;
mod list;
mod search;

pub use add::cmd_add_show;
pub use add_user::cmd_add_user;
pub use init::cmd_init;
pub use list::cmd_list_shows;
pub use search::cmd_search_shows;
