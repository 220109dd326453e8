use shared::types::User;
use sqlx::SqlitePool;
use tracing::info;

use crate::database::utils::{generate_uuid_token, get_timestamp};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Insert a new user. A single statement, so the row is either fully written
/// or not at all; a duplicate username fails on the UNIQUE constraint.
pub async fn register_user(pool: &SqlitePool, new_user: NewUser) -> Result<User, sqlx::Error> {
    let user = User {
        id: generate_uuid_token(),
        username: new_user.username,
        password_hash: new_user.password_hash,
        created_at: get_timestamp(),
    };

    sqlx::query(
        "INSERT INTO users (id, username, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    info!("New user made! {}", user);
    Ok(user)
}

/// Get user by username
pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}
