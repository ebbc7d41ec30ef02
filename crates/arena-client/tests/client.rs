//! Drives the client against a real server bound to an ephemeral port.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use arena_api::{AppState, router};
use arena_battle::apply_experience;
use arena_client::{ApiClient, ClientError, duel};
use arena_db::Database;
use arena_types::api::BattleResultRequest;
use arena_types::models::BattleOutcome;

async fn spawn_server() -> ApiClient {
    let db = Database::open_in_memory().expect("Failed to open in-memory database");
    let app = router(AppState::new(Arc::new(db)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::new(format!("http://{addr}/"))
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = ApiClient::new("http://localhost:3000/");
    assert_eq!(client.base_url(), "http://localhost:3000");
}

#[tokio::test]
async fn test_current_user_requires_registration() {
    let client = spawn_server().await;
    assert!(matches!(client.current_user().await, Err(ClientError::NoUsers)));

    let created = client.create_user("Player1").await.unwrap();
    let current = client.current_user().await.unwrap();
    assert_eq!(current.id, created.id);
}

#[tokio::test]
async fn test_error_body_surfaces_as_status() {
    let client = spawn_server().await;

    match client.create_user("").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("displayName"));
        }
        other => panic!("expected 400, got {other:?}"),
    }

    match client.get_user(Uuid::new_v4()).await {
        Err(ClientError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {other:?}"),
    }
}

#[tokio::test]
async fn test_enemy_toggle_round_trip() {
    let client = spawn_server().await;

    assert_eq!(client.list_enemies(false).await.unwrap().len(), 3);
    let orc = client.set_enemy_active("3", false).await.unwrap();
    assert!(!orc.is_active);
    assert_eq!(client.list_enemies(false).await.unwrap().len(), 2);
    assert_eq!(client.list_enemies(true).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_submit_result_credits_experience() {
    let client = spawn_server().await;
    let user = client.create_user("Player1").await.unwrap();

    let ok = client
        .submit_result(&BattleResultRequest {
            user_id: user.id,
            enemy_id: "1".into(),
            total_damage: 1200,
            result: BattleOutcome::Win,
        })
        .await
        .unwrap();
    assert!(ok.success);

    let user = client.get_user(user.id).await.unwrap();
    assert_eq!(user.total_xp, 1200);
    assert_eq!(user.level, 2);
}

#[tokio::test]
async fn test_duel_records_log_and_experience() {
    let client = spawn_server().await;
    assert!(client.ghost().await.unwrap().is_none());

    let user = client.create_user("Player1").await.unwrap();
    let enemy = client.list_enemies(false).await.unwrap().remove(0);

    let mut rng = StdRng::seed_from_u64(2024);
    let report = duel(&client, &user, &enemy, &mut rng).await.unwrap();

    assert_eq!(report.log.user_id, user.id);
    assert_eq!(report.log.enemy_id, enemy.id);
    assert_eq!(report.log.damage_dealt, report.summary.total_damage);
    assert_eq!(report.log.replay_data, report.summary.replay);
    assert!(!report.log.replay_data.is_empty());
    if report.summary.outcome == BattleOutcome::Win {
        assert_eq!(report.summary.total_damage, enemy.hp);
    }

    let expected = apply_experience(0, report.summary.total_damage).unwrap();
    let user = client.get_user(user.id).await.unwrap();
    assert_eq!(user.total_xp, expected.total_xp);
    assert_eq!(user.level, expected.level);

    let logs = client.list_battle_logs(Some(user.id)).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(client.ghost().await.unwrap().unwrap().id, report.log.id);
}
