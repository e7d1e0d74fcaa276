use crate::config::Config;
use crate::constants::accounts::GENERATED_PASSWORD_LENGTH;
use crate::db::Store;
use crate::db::repositories::user::generate_password;

pub async fn cmd_add_user(
    config: &Config,
    username: &str,
    password: Option<&str>,
) -> anyhow::Result<()> {
    let username = username.trim();
    if username.is_empty() {
        anyhow::bail!("Username cannot be empty");
    }

    let store = Store::new(&config.general.database_path).await?;

    if store.get_user_by_username(username).await?.is_some() {
        anyhow::bail!("User '{username}' already exists");
    }

    let (password, generated) = match password {
        Some(p) if !p.is_empty() => (p.to_string(), false),
        _ => (generate_password(GENERATED_PASSWORD_LENGTH), true),
    };

    let user = store
        .create_user(username, &password, &config.security)
        .await?;

    println!("✓ Created user '{}' (ID: {})", user.username, user.id);
    if generated {
        println!("  Password: {password}");
    }
    println!("  API key:  {}", user.api_key);

    Ok(())
}
