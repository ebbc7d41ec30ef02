use crate::Database;
use crate::models::{BattleLogRow, EnemyRow, NewBattleLog, RecordedBattle, UserRow};
use anyhow::Result;
use arena_battle::XP_PER_LEVEL;
use rusqlite::{Connection, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, display_name, level, total_xp, created_at";
const ENEMY_COLUMNS: &str = "id, name, hp, asset_url, attack_pattern, is_active";
const BATTLE_LOG_COLUMNS: &str =
    "id, user_id, enemy_id, damage_dealt, duration, replay_data, created_at";

impl Database {
    // -- Users --

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, rowid"
            ))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create_user(&self, id: &str, display_name: &str) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (id, display_name) VALUES (?1, ?2) RETURNING {USER_COLUMNS}"
                ),
                (id, display_name),
                user_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
                user_from_row,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    // -- Enemies --

    pub fn list_enemies(&self, include_inactive: bool) -> Result<Vec<EnemyRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENEMY_COLUMNS} FROM enemies WHERE ?1 OR is_active = 1 ORDER BY rowid"
            ))?;
            let rows = stmt
                .query_map([include_inactive], enemy_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_enemy(&self, id: &str) -> Result<Option<EnemyRow>> {
        self.with_conn(|conn| query_enemy(conn, id))
    }

    /// Returns the updated enemy, or `None` if no enemy has this id.
    pub fn set_enemy_active(&self, id: &str, active: bool) -> Result<Option<EnemyRow>> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE enemies SET is_active = ?2 WHERE id = ?1",
                rusqlite::params![id, active],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_enemy(conn, id)
        })
    }

    // -- Battle logs --

    /// Newest first, optionally restricted to one user.
    pub fn list_battle_logs(&self, user_id: Option<&str>, limit: u32) -> Result<Vec<BattleLogRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BATTLE_LOG_COLUMNS} FROM battle_logs
                 WHERE ?1 IS NULL OR user_id = ?1
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2"
            ))?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], battle_log_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Any one stored log, picked at random.
    pub fn random_battle_log(&self) -> Result<Option<BattleLogRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {BATTLE_LOG_COLUMNS} FROM battle_logs ORDER BY RANDOM() LIMIT 1"),
                [],
                battle_log_from_row,
            )
            .optional()
            .map_err(Into::into)
        })
    }

    /// Credit `damage_dealt` as experience and store the log, in one
    /// transaction.
    ///
    /// The experience update is a single statement, so concurrent submissions
    /// for the same user always leave `level = total_xp / 1000 + 1`. Returns
    /// `None` (and writes nothing) when the user does not exist. An unknown
    /// enemy fails the foreign key and comes back as an error.
    pub fn record_battle(&self, log: &NewBattleLog<'_>) -> Result<Option<RecordedBattle>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let progress = tx
                .query_row(
                    "UPDATE users
                     SET total_xp = total_xp + ?2,
                         level = (total_xp + ?2) / ?3 + 1
                     WHERE id = ?1
                     RETURNING total_xp, level",
                    rusqlite::params![log.user_id, log.damage_dealt, XP_PER_LEVEL],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()?;

            // Dropping the transaction rolls it back.
            let Some((total_xp, level)) = progress else {
                return Ok(None);
            };

            let stored = tx.query_row(
                &format!(
                    "INSERT INTO battle_logs (id, user_id, enemy_id, damage_dealt, duration, replay_data)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     RETURNING {BATTLE_LOG_COLUMNS}"
                ),
                rusqlite::params![
                    log.id,
                    log.user_id,
                    log.enemy_id,
                    log.damage_dealt,
                    log.duration,
                    log.replay_data,
                ],
                battle_log_from_row,
            )?;

            tx.commit()?;

            Ok(Some(RecordedBattle {
                log: stored,
                total_xp,
                level,
            }))
        })
    }
}

fn query_enemy(conn: &Connection, id: &str) -> Result<Option<EnemyRow>> {
    conn.query_row(
        &format!("SELECT {ENEMY_COLUMNS} FROM enemies WHERE id = ?1"),
        [id],
        enemy_from_row,
    )
    .optional()
    .map_err(Into::into)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        display_name: row.get(1)?,
        level: row.get(2)?,
        total_xp: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn enemy_from_row(row: &Row<'_>) -> rusqlite::Result<EnemyRow> {
    Ok(EnemyRow {
        id: row.get(0)?,
        name: row.get(1)?,
        hp: row.get(2)?,
        asset_url: row.get(3)?,
        attack_pattern: row.get(4)?,
        is_active: row.get(5)?,
    })
}

fn battle_log_from_row(row: &Row<'_>) -> rusqlite::Result<BattleLogRow> {
    Ok(BattleLogRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        enemy_id: row.get(2)?,
        damage_dealt: row.get(3)?,
        duration: row.get(4)?,
        replay_data: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_battle::{apply_experience, level_for_xp};
    use std::sync::Arc;
    use std::thread;
    use uuid::Uuid;

    fn new_user(db: &Database, name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        db.create_user(&id, name).unwrap();
        id
    }

    fn log_for<'a>(id: &'a str, user_id: &'a str, enemy_id: &'a str, damage: i64) -> NewBattleLog<'a> {
        NewBattleLog {
            id,
            user_id,
            enemy_id,
            damage_dealt: damage,
            duration: 0,
            replay_data: "[]",
        }
    }

    #[test]
    fn test_new_user_defaults() {
        let db = Database::open_in_memory().unwrap();
        let id = new_user(&db, "Player1");

        let user = db.get_user(&id).unwrap().unwrap();
        assert_eq!(user.display_name, "Player1");
        assert_eq!(user.level, 1);
        assert_eq!(user.total_xp, 0);
        assert!(!user.created_at.is_empty());
        assert!(db.get_user(&Uuid::new_v4().to_string()).unwrap().is_none());
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_seeded_enemies_and_activation() {
        let db = Database::open_in_memory().unwrap();
        let active = db.list_enemies(false).unwrap();
        assert_eq!(active.len(), 3);
        assert_eq!(active[0].name, "Slime");
        assert_eq!(active[0].attack_pattern, "{}");

        let goblin = db.set_enemy_active("2", false).unwrap().unwrap();
        assert!(!goblin.is_active);
        assert_eq!(db.list_enemies(false).unwrap().len(), 2);
        assert_eq!(db.list_enemies(true).unwrap().len(), 3);

        assert!(db.set_enemy_active("missing", true).unwrap().is_none());
        assert_eq!(db.get_enemy("3").unwrap().unwrap().hp, 450);
        assert!(db.get_enemy("missing").unwrap().is_none());
    }

    #[test]
    fn test_record_battle_matches_leveling_rule() {
        let db = Database::open_in_memory().unwrap();
        let user_id = new_user(&db, "Player1");

        let first = db.record_battle(&log_for("a", &user_id, "1", 950)).unwrap().unwrap();
        assert_eq!((first.total_xp, first.level), (950, 1));

        let second = db.record_battle(&log_for("b", &user_id, "1", 100)).unwrap().unwrap();
        let expected = apply_experience(950, 100).unwrap();
        assert_eq!(second.total_xp, expected.total_xp);
        assert_eq!(second.level, expected.level);
        assert_eq!(second.log.damage_dealt, 100);

        let user = db.get_user(&user_id).unwrap().unwrap();
        assert_eq!((user.total_xp, user.level), (1050, 2));
    }

    #[test]
    fn test_concurrent_battles_keep_level_consistent() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let user_id = new_user(&db, "Player1");

        let handles: Vec<_> = (1..=16i64)
            .map(|n| {
                let db = Arc::clone(&db);
                let user_id = user_id.clone();
                thread::spawn(move || {
                    let log_id = format!("log-{n}");
                    let recorded = db
                        .record_battle(&log_for(&log_id, &user_id, "1", n * 137))
                        .unwrap()
                        .unwrap();
                    assert_eq!(recorded.level, level_for_xp(recorded.total_xp));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected: i64 = (1..=16i64).map(|n| n * 137).sum();
        let user = db.get_user(&user_id).unwrap().unwrap();
        assert_eq!(user.total_xp, expected);
        assert_eq!(user.level, user.total_xp / 1000 + 1);
        assert_eq!(db.list_battle_logs(Some(&user_id), 50).unwrap().len(), 16);
    }

    #[test]
    fn test_record_battle_unknown_user_writes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let ghost = Uuid::new_v4().to_string();

        assert!(db.record_battle(&log_for("a", &ghost, "1", 10)).unwrap().is_none());
        assert!(db.list_battle_logs(None, 50).unwrap().is_empty());
    }

    #[test]
    fn test_record_battle_unknown_enemy_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let user_id = new_user(&db, "Player1");

        assert!(db.record_battle(&log_for("a", &user_id, "404", 500)).is_err());
        let user = db.get_user(&user_id).unwrap().unwrap();
        assert_eq!(user.total_xp, 0);
    }

    #[test]
    fn test_list_battle_logs_filters_and_orders() {
        let db = Database::open_in_memory().unwrap();
        let alice = new_user(&db, "alice");
        let bob = new_user(&db, "bob");

        db.record_battle(&log_for("a1", &alice, "1", 10)).unwrap();
        db.record_battle(&log_for("b1", &bob, "2", 20)).unwrap();
        db.record_battle(&log_for("a2", &alice, "3", 30)).unwrap();

        let all = db.list_battle_logs(None, 50).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "a2");

        let only_alice = db.list_battle_logs(Some(&alice), 50).unwrap();
        let ids: Vec<&str> = only_alice.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);

        assert_eq!(db.list_battle_logs(None, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_random_battle_log() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.random_battle_log().unwrap().is_none());

        let user_id = new_user(&db, "Player1");
        db.record_battle(&log_for("only", &user_id, "1", 10)).unwrap();
        let ghost = db.random_battle_log().unwrap().unwrap();
        assert_eq!(ghost.id, "only");
        assert_eq!(ghost.replay_data, "[]");
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arena.db");

        let id = {
            let db = Database::open(&path).unwrap();
            db.set_enemy_active("3", false).unwrap();
            new_user(&db, "Player1")
        };

        let db = Database::open(&path).unwrap();
        assert!(db.get_user(&id).unwrap().is_some());
        assert_eq!(db.list_enemies(false).unwrap().len(), 2);
    }
}
