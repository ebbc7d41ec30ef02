//! Play one simulated battle against the arena server and report it.
//!
//! Environment:
//! - `ARENA_API_URL`  server base URL (default `http://127.0.0.1:3000`)
//! - `ARENA_USER_ID`  player to fight as (default: first registered user)
//! - `ARENA_ENEMY_ID` enemy to fight (default: first active enemy)

use anyhow::Context;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use uuid::Uuid;

use arena_client::{ApiClient, ClientError, duel};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_client=info,arena_duel=info".into()),
        )
        .init();

    let base_url =
        std::env::var("ARENA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".into());
    let client = ApiClient::new(base_url);

    let user = match std::env::var("ARENA_USER_ID").ok() {
        Some(raw) => {
            let id: Uuid = raw.parse().context("ARENA_USER_ID is not a UUID")?;
            client.get_user(id).await?
        }
        None => client.current_user().await?,
    };

    let enemies = client.list_enemies(false).await?;
    let enemy = match std::env::var("ARENA_ENEMY_ID").ok() {
        Some(id) => enemies
            .into_iter()
            .find(|e| e.id == id)
            .with_context(|| format!("No active enemy with id {}", id))?,
        None => enemies.into_iter().next().ok_or(ClientError::NoEnemies)?,
    };

    if let Some(ghost) = client.ghost().await? {
        info!("Ghost to beat: {} damage in {}s", ghost.damage_dealt, ghost.duration);
    }

    let mut rng = StdRng::from_os_rng();
    let report = duel(&client, &user, &enemy, &mut rng).await?;

    let user = client.get_user(user.id).await?;
    info!(
        "Recorded battle {}: {} now level {} ({} xp)",
        report.log.id, user.display_name, user.level, user.total_xp
    );
    Ok(())
}
