use crate::clients::MetadataProvider;
use crate::clients::tmdb::TmdbClient;
use crate::config::Config;

pub async fn cmd_search_shows(config: &Config, query: &str) -> anyhow::Result<()> {
    println!("Searching for: {query}");

    let tmdb = TmdbClient::new(&config.tmdb)?;
    let results = tmdb.search_shows(query).await?;

    if results.shows.is_empty() {
        println!("No shows found matching '{query}'");
        return Ok(());
    }

    println!();
    println!("Search Results ({} total):", results.total_results);
    println!("{:-<60}", "");

    for show in results.shows.iter().take(10) {
        println!("• {} (TMDB ID: {})", show.name, show.tmdb_id);
        if let Some(overview) = show.overview.as_deref().filter(|o| !o.is_empty()) {
            let short: String = overview.chars().take(100).collect();
            println!("  {short}");
        }
        println!();
    }

    println!("To add a show: showmark add <tmdb_id>");

    Ok(())
}
