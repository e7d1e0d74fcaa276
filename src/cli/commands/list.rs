use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_shows(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let shows = store.list_shows().await?;

    if shows.is_empty() {
        println!("No shows tracked yet.");
        println!("Use 'showmark search <query>' then 'showmark add <tmdb_id>'");
        return Ok(());
    }

    println!("Tracked Shows ({}):", shows.len());
    println!("{:-<60}", "");

    for show in &shows {
        println!("  [{}] {}", show.id, show.name);
    }

    Ok(())
}
