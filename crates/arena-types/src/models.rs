use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub display_name: String,
    pub level: i64,
    pub total_xp: i64,
    pub created_at: DateTime<Utc>,
}

/// Reference data seeded at migration time. Only `is_active` ever changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub hp: i64,
    pub asset_url: Option<String>,
    /// Opaque to the server; the client interprets it.
    pub attack_pattern: serde_json::Value,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub enemy_id: String,
    pub damage_dealt: i64,
    /// Seconds.
    pub duration: i64,
    pub replay_data: Vec<ReplayEvent>,
    pub created_at: DateTime<Utc>,
}

/// One damage event of a battle replay, keyed with the compact field names
/// the client stores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayEvent {
    /// Offset from battle start, in seconds.
    #[serde(rename = "t")]
    pub offset_secs: f64,
    #[serde(rename = "d")]
    pub damage: i64,
    #[serde(rename = "c")]
    pub critical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BattleOutcome {
    Win,
    Lose,
}

impl BattleOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Win => "WIN",
            Self::Lose => "LOSE",
        }
    }
}

impl std::fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
