//! Typed client for the arena HTTP API, plus the glue that plays a simulated
//! battle and reports it.

pub mod duel;
pub mod error;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use arena_types::api::{
    BattleResultRequest, CreateBattleLogRequest, CreateUserRequest, ErrorResponse,
    SuccessResponse, UpdateEnemyRequest,
};
use arena_types::models::{BattleLog, Enemy, User};

pub use crate::duel::{DuelReport, duel};
pub use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -- Users --

    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        let resp = self.http.get(self.url("/users")).send().await?;
        decode(resp).await
    }

    pub async fn create_user(&self, display_name: &str) -> Result<User, ClientError> {
        let body = CreateUserRequest {
            display_name: display_name.to_string(),
        };
        let resp = self.http.post(self.url("/users")).json(&body).send().await?;
        decode(resp).await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, ClientError> {
        let resp = self.http.get(self.url(&format!("/users/{id}"))).send().await?;
        decode(resp).await
    }

    /// The first registered user. The mobile client has no login, so this is
    /// the player.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.list_users()
            .await?
            .into_iter()
            .next()
            .ok_or(ClientError::NoUsers)
    }

    // -- Enemies --

    pub async fn list_enemies(&self, include_inactive: bool) -> Result<Vec<Enemy>, ClientError> {
        let resp = self
            .http
            .get(self.url("/enemies"))
            .query(&[("includeInactive", include_inactive)])
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn set_enemy_active(&self, id: &str, is_active: bool) -> Result<Enemy, ClientError> {
        let resp = self
            .http
            .patch(self.url(&format!("/enemies/{id}")))
            .json(&UpdateEnemyRequest { is_active })
            .send()
            .await?;
        decode(resp).await
    }

    // -- Battle --

    pub async fn list_battle_logs(&self, user_id: Option<Uuid>) -> Result<Vec<BattleLog>, ClientError> {
        let mut req = self.http.get(self.url("/battle/logs"));
        if let Some(user_id) = user_id {
            req = req.query(&[("userId", user_id.to_string())]);
        }
        decode(req.send().await?).await
    }

    pub async fn create_battle_log(&self, log: &CreateBattleLogRequest) -> Result<BattleLog, ClientError> {
        let resp = self.http.post(self.url("/battle/logs")).json(log).send().await?;
        decode(resp).await
    }

    pub async fn submit_result(&self, result: &BattleResultRequest) -> Result<SuccessResponse, ClientError> {
        let resp = self.http.post(self.url("/battle/result")).json(result).send().await?;
        decode(resp).await
    }

    /// A stored battle to race against, or `None` if nobody has fought yet.
    pub async fn ghost(&self) -> Result<Option<BattleLog>, ClientError> {
        match decode(self.http.get(self.url("/battle/ghost")).send().await?).await {
            Ok(log) => Ok(Some(log)),
            Err(ClientError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|e| e.error)
        .unwrap_or(text);
    debug!("API returned {}: {}", status, message);
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}
