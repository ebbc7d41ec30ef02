use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);"
    )?;

    let version: i64 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id            TEXT PRIMARY KEY,
                display_name  TEXT NOT NULL,
                level         INTEGER NOT NULL DEFAULT 1,
                total_xp      INTEGER NOT NULL DEFAULT 0,
                created_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE enemies (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                hp              INTEGER NOT NULL,
                asset_url       TEXT,
                attack_pattern  TEXT NOT NULL DEFAULT '{}',
                is_active       INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE battle_logs (
                id            TEXT PRIMARY KEY,
                user_id       TEXT NOT NULL REFERENCES users(id),
                enemy_id      TEXT NOT NULL REFERENCES enemies(id),
                damage_dealt  INTEGER NOT NULL,
                duration      INTEGER NOT NULL,
                replay_data   TEXT NOT NULL DEFAULT '[]',
                created_at    TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_battle_logs_user
                ON battle_logs(user_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    seed_enemies(conn)?;

    info!("Database migrations complete");
    Ok(())
}

/// Starter roster. Re-running is a no-op, so an operator's activation
/// changes survive restarts.
fn seed_enemies(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        INSERT OR IGNORE INTO enemies (id, name, hp) VALUES ('1', 'Slime', 350);
        INSERT OR IGNORE INTO enemies (id, name, hp) VALUES ('2', 'Goblin', 400);
        INSERT OR IGNORE INTO enemies (id, name, hp) VALUES ('3', 'Orc', 450);
        ",
    )?;
    Ok(())
}
