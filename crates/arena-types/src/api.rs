use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BattleOutcome, ReplayEvent};

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserRequest {
    pub display_name: String,
}

// -- Enemies --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEnemyRequest {
    pub is_active: bool,
}

// -- Battle logs --

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLogQuery {
    pub user_id: Option<Uuid>,
    pub limit: Option<u32>,
}

/// Full log submitted by a client that tracked duration and replay events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateBattleLogRequest {
    pub user_id: Uuid,
    pub enemy_id: String,
    pub damage_dealt: i64,
    pub duration: i64,
    #[serde(default)]
    pub replay_data: Vec<ReplayEvent>,
}

/// Summary-only submission: the log is stored with zero duration and no replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BattleResultRequest {
    pub user_id: Uuid,
    pub enemy_id: String,
    pub total_damage: i64,
    pub result: BattleOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// -- Misc --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
