use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};
use uuid::Uuid;

use arena_battle::level_for_xp;
use arena_db::models::{NewBattleLog, RecordedBattle};
use arena_types::api::{BattleLogQuery, BattleResultRequest, CreateBattleLogRequest, SuccessResponse};
use arena_types::models::{BattleLog, ReplayEvent};

use crate::AppState;
use crate::convert;
use crate::error::ApiError;

const DEFAULT_LOG_LIMIT: u32 = 50;
const MAX_LOG_LIMIT: u32 = 200;

/// Largest damage credited by one submission. Keeps a user's running
/// experience total far from the `i64` bound.
const MAX_DAMAGE: i64 = i32::MAX as i64;

/// A validated battle submission, owned so it can move into the blocking pool.
struct Submission {
    user_id: Uuid,
    enemy_id: String,
    damage_dealt: i64,
    duration: i64,
    replay: Vec<ReplayEvent>,
}

impl Submission {
    fn validate(self) -> Result<Self, ApiError> {
        if self.enemy_id.trim().is_empty() {
            return Err(ApiError::BadRequest("enemyId must not be empty".into()));
        }
        if self.damage_dealt < 0 {
            return Err(ApiError::BadRequest("damage must not be negative".into()));
        }
        if self.damage_dealt > MAX_DAMAGE {
            return Err(ApiError::BadRequest(format!(
                "damage must not exceed {}",
                MAX_DAMAGE
            )));
        }
        if self.duration < 0 {
            return Err(ApiError::BadRequest("duration must not be negative".into()));
        }
        Ok(self)
    }
}

/// Store the log and credit its damage as experience. Unknown user → 404.
async fn record(state: &AppState, submission: Submission) -> Result<RecordedBattle, ApiError> {
    let submission = submission.validate()?;
    let replay_json = serde_json::to_string(&submission.replay)
        .map_err(|e| ApiError::Internal(e.into()))?;
    let log_id = Uuid::new_v4().to_string();
    let user_id = submission.user_id;

    let recorded = state
        .blocking(move |db| {
            db.record_battle(&NewBattleLog {
                id: &log_id,
                user_id: &user_id.to_string(),
                enemy_id: &submission.enemy_id,
                damage_dealt: submission.damage_dealt,
                duration: submission.duration,
                replay_data: &replay_json,
            })
        })
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))?;

    let previous_level = level_for_xp(recorded.total_xp - recorded.log.damage_dealt);
    if recorded.level > previous_level {
        info!("User {} reached level {}", user_id, recorded.level);
    }
    debug!(
        "Battle {} stored: user={} enemy={} damage={} xp={}",
        recorded.log.id, user_id, recorded.log.enemy_id, recorded.log.damage_dealt, recorded.total_xp
    );

    Ok(recorded)
}

/// GET /battle/logs — newest first, optionally for one user.
pub async fn list_logs(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<BattleLogQuery>, ApiError>,
) -> Result<Json<Vec<BattleLog>>, ApiError> {
    let user_id = query.user_id.map(|id| id.to_string());
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);

    let rows = state
        .blocking(move |db| db.list_battle_logs(user_id.as_deref(), limit))
        .await?;
    Ok(Json(rows.into_iter().map(convert::battle_log).collect()))
}

/// POST /battle/logs — full log with duration and replay events.
pub async fn create_log(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateBattleLogRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let recorded = record(
        &state,
        Submission {
            user_id: req.user_id,
            enemy_id: req.enemy_id,
            damage_dealt: req.damage_dealt,
            duration: req.duration,
            replay: req.replay_data,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(convert::battle_log(recorded.log))))
}

/// POST /battle/result — summary only; stored with zero duration and no replay.
pub async fn submit_result(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<BattleResultRequest>, ApiError>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let outcome = req.result;
    let recorded = record(
        &state,
        Submission {
            user_id: req.user_id,
            enemy_id: req.enemy_id,
            damage_dealt: req.total_damage,
            duration: 0,
            replay: Vec::new(),
        },
    )
    .await?;

    info!(
        "Battle result {} for user {} vs enemy {} ({} damage)",
        outcome, req.user_id, recorded.log.enemy_id, recorded.log.damage_dealt
    );
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /battle/ghost — any one stored battle, for replay display.
pub async fn ghost(State(state): State<AppState>) -> Result<Json<BattleLog>, ApiError> {
    let row = state
        .blocking(|db| db.random_battle_log())
        .await?
        .ok_or_else(|| ApiError::NotFound("No ghost found".into()))?;
    Ok(Json(convert::battle_log(row)))
}
