//! Row → API model conversion.
//!
//! Rows written by this server always convert cleanly. Anything that fails to
//! parse was corrupted outside of it, so it is logged and replaced with a
//! default rather than failing the whole listing.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use arena_db::models::{BattleLogRow, EnemyRow, UserRow};
use arena_types::models::{BattleLog, Enemy, ReplayEvent, User};

/// SQLite stores `datetime('now')` as "YYYY-MM-DD HH:MM:SS" without a
/// timezone; it is UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

fn timestamp_or_default(raw: &str, owner: &str) -> DateTime<Utc> {
    parse_timestamp(raw).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on '{}'", raw, owner);
        DateTime::default()
    })
}

fn uuid_or_nil(raw: &str, column: &str, owner: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on '{}': {}", column, raw, owner, e);
        Uuid::nil()
    })
}

pub fn user(row: UserRow) -> User {
    User {
        id: uuid_or_nil(&row.id, "id", &row.id),
        created_at: timestamp_or_default(&row.created_at, &row.id),
        display_name: row.display_name,
        level: row.level,
        total_xp: row.total_xp,
    }
}

pub fn enemy(row: EnemyRow) -> Enemy {
    let attack_pattern = serde_json::from_str(&row.attack_pattern).unwrap_or_else(|e| {
        warn!("Corrupt attack_pattern on enemy '{}': {}", row.id, e);
        serde_json::Value::Object(Default::default())
    });

    Enemy {
        id: row.id,
        name: row.name,
        hp: row.hp,
        asset_url: row.asset_url,
        attack_pattern,
        is_active: row.is_active,
    }
}

pub fn battle_log(row: BattleLogRow) -> BattleLog {
    let replay_data: Vec<ReplayEvent> = serde_json::from_str(&row.replay_data).unwrap_or_else(|e| {
        warn!("Corrupt replay_data on battle log '{}': {}", row.id, e);
        Vec::new()
    });

    BattleLog {
        id: uuid_or_nil(&row.id, "id", &row.id),
        user_id: uuid_or_nil(&row.user_id, "user_id", &row.id),
        created_at: timestamp_or_default(&row.created_at, &row.id),
        enemy_id: row.enemy_id,
        damage_dealt: row.damage_dealt,
        duration: row.duration,
        replay_data,
    }
}
