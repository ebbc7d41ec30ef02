use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::info;
use uuid::Uuid;

use arena_types::api::CreateUserRequest;
use arena_types::models::User;

use crate::AppState;
use crate::convert;
use crate::error::ApiError;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let rows = state.blocking(|db| db.list_users()).await?;
    Ok(Json(rows.into_iter().map(convert::user).collect()))
}

/// POST /users — register a player. Level and experience start at 1 and 0.
pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let display_name = req.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ApiError::BadRequest("displayName must not be empty".into()));
    }

    let user_id = Uuid::new_v4();
    let row = state
        .blocking(move |db| db.create_user(&user_id.to_string(), &display_name))
        .await?;

    info!("Created user {} ({})", row.display_name, row.id);
    Ok((StatusCode::CREATED, Json(convert::user(row))))
}

pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(user_id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<User>, ApiError> {
    let row = state
        .blocking(move |db| db.get_user(&user_id.to_string()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", user_id)))?;

    Ok(Json(convert::user(row)))
}
