use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use arena_types::api::{EnemyQuery, UpdateEnemyRequest};
use arena_types::models::Enemy;

use crate::AppState;
use crate::convert;
use crate::error::ApiError;

/// GET /enemies — active enemies only unless `includeInactive=true`.
pub async fn list_enemies(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<EnemyQuery>, ApiError>,
) -> Result<Json<Vec<Enemy>>, ApiError> {
    let include_inactive = query.include_inactive;
    let rows = state
        .blocking(move |db| db.list_enemies(include_inactive))
        .await?;
    Ok(Json(rows.into_iter().map(convert::enemy).collect()))
}

/// PATCH /enemies/{id} — toggle whether an enemy is offered to players.
pub async fn update_enemy(
    State(state): State<AppState>,
    WithRejection(Path(enemy_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateEnemyRequest>, ApiError>,
) -> Result<Json<Enemy>, ApiError> {
    let id = enemy_id.clone();
    let row = state
        .blocking(move |db| db.set_enemy_active(&id, req.is_active))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Enemy not found: {}", enemy_id)))?;

    info!("Enemy {} is_active={}", row.id, row.is_active);
    Ok(Json(convert::enemy(row)))
}
