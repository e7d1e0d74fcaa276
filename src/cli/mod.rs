//! Command-line interface for Showmark.

mod commands;

pub use commands::{cmd_add_show, cmd_add_user, cmd_init, cmd_list_shows, cmd_search_shows};

use clap::{Parser, Subcommand};

/// Showmark - per-user episode flag tracker
#[derive(Parser)]
#[command(name = "showmark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create a user account
    AddUser {
        username: String,

        /// Password to set; a random one is generated when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Create default config file
    Init,

    /// Search TMDB for shows without adding
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Add a show by its TMDB id
    #[command(alias = "a")]
    Add {
        /// TMDB id of the show
        tmdb_id: i32,
    },

    /// List all tracked shows
    #[command(alias = "ls", alias = "l")]
    List,
}
