pub mod battle;
pub mod convert;
pub mod enemies;
pub mod error;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, patch, post},
};

use arena_db::Database;
use arena_types::api::HealthResponse;

use crate::error::ApiError;

/// Shared application state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run a database call off the async runtime.
    pub(crate) async fn blocking<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("spawn_blocking join error: {}", e)))?
            .map_err(ApiError::from)
    }
}

/// All routes. Middleware (CORS, tracing) is layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user))
        .route("/enemies", get(enemies::list_enemies))
        .route("/enemies/{id}", patch(enemies::update_enemy))
        .route("/battle/logs", get(battle::list_logs).post(battle::create_log))
        .route("/battle/result", post(battle::submit_result))
        .route("/battle/ghost", get(battle::ghost))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
