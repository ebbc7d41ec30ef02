use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("no users registered")]
    NoUsers,

    #[error("no active enemies")]
    NoEnemies,

    #[error(transparent)]
    Battle(#[from] arena_battle::BattleError),
}
