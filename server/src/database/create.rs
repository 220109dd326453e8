use sqlx::SqlitePool;
use tracing::info;

/// Current schema version, stored in `PRAGMA user_version`.
const SCHEMA_VERSION: u32 = 1;

/// Initialize the database schema. Safe to run on every start.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id            TEXT    PRIMARY KEY,
            username      TEXT    NOT NULL UNIQUE,
            password_hash TEXT    NOT NULL,
            created_at    INTEGER NOT NULL
        )",
    )
    .execute(&mut *tx)
    .await?;

    // One row per login. The token is the cookie value; deleting the row
    // logs the browser out.
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS sessions (
            token      TEXT    PRIMARY KEY,
            user_id    TEXT    NOT NULL,
            created_at INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
        )",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS jokes (
            id          TEXT    PRIMARY KEY,
            jokester_id TEXT    NOT NULL,
            name        TEXT    NOT NULL,
            content     TEXT    NOT NULL,
            created_at  INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL,
            FOREIGN KEY (jokester_id) REFERENCES users(id) ON DELETE CASCADE
        )",
    )
    .execute(&mut *tx)
    .await?;

    // --- Indexes --------------------------------------------------------
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id   ON sessions(user_id)")
        .execute(&mut *tx)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_expires   ON sessions(expires_at)")
        .execute(&mut *tx)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_jokes_jokester_id  ON jokes(jokester_id)")
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Database schema ready (version {})", SCHEMA_VERSION);
    Ok(())
}
