//! Database row types. These map directly to SQLite rows and are kept
//! distinct from the arena-types API models so the DB layer stays independent.

pub struct UserRow {
    pub id: String,
    pub display_name: String,
    pub level: i64,
    pub total_xp: i64,
    pub created_at: String,
}

pub struct EnemyRow {
    pub id: String,
    pub name: String,
    pub hp: i64,
    pub asset_url: Option<String>,
    /// Serialized JSON object.
    pub attack_pattern: String,
    pub is_active: bool,
}

pub struct BattleLogRow {
    pub id: String,
    pub user_id: String,
    pub enemy_id: String,
    pub damage_dealt: i64,
    pub duration: i64,
    /// Serialized JSON array of replay events.
    pub replay_data: String,
    pub created_at: String,
}

/// Insert payload for [`crate::Database::record_battle`].
pub struct NewBattleLog<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub enemy_id: &'a str,
    pub damage_dealt: i64,
    pub duration: i64,
    pub replay_data: &'a str,
}

/// A stored battle log together with the user's experience after it was
/// credited.
pub struct RecordedBattle {
    pub log: BattleLogRow,
    pub total_xp: i64,
    pub level: i64,
}
