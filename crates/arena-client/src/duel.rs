use rand::Rng;
use tracing::info;

use arena_battle::battle::TURN_INTERVAL;
use arena_battle::{Battle, BattleSummary, player_max_hp};
use arena_types::models::{BattleLog, Enemy, User};

use crate::{ApiClient, ClientError};

#[derive(Debug, Clone)]
pub struct DuelReport {
    pub summary: BattleSummary,
    pub log: BattleLog,
}

/// Fight `enemy` as `user` and submit the full log.
///
/// Player hit points come from the user's level, the enemy's from its record.
/// The battle runs on the simulated clock, so the reported duration is the
/// number of exchanges times [`TURN_INTERVAL`].
pub async fn duel<R: Rng + ?Sized>(
    client: &ApiClient,
    user: &User,
    enemy: &Enemy,
    rng: &mut R,
) -> Result<DuelReport, ClientError> {
    let mut battle = Battle::new(player_max_hp(user.level), enemy.hp);
    battle.simulate(rng);

    let elapsed = TURN_INTERVAL * battle.replay().len() as u32;
    let summary = battle.summary(elapsed)?;
    info!(
        "{} vs {}: {} ({} damage in {}s)",
        user.display_name, enemy.name, summary.outcome, summary.total_damage, summary.duration_secs
    );

    let log = client
        .create_battle_log(&summary.clone().into_log_request(user.id, &enemy.id))
        .await?;

    Ok(DuelReport { summary, log })
}
