use shared::types::{Joke, NewJoke};
use sqlx::SqlitePool;
use tracing::info;

use crate::database::utils::{generate_uuid_token, get_timestamp};

#[derive(Debug, sqlx::FromRow)]
struct JokeRow {
    id: String,
    jokester_id: String,
    name: String,
    content: String,
    created_at: i64,
    updated_at: i64,
}

impl From<JokeRow> for Joke {
    fn from(row: JokeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            content: row.content,
            jokester_id: row.jokester_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insert a joke and return the stored row
pub async fn create_joke(pool: &SqlitePool, new_joke: NewJoke) -> Result<Joke, sqlx::Error> {
    let now = get_timestamp();
    let joke = Joke {
        id: generate_uuid_token(),
        name: new_joke.name,
        content: new_joke.content,
        jokester_id: new_joke.jokester_id,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO jokes (id, jokester_id, name, content, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&joke.id)
    .bind(&joke.jokester_id)
    .bind(&joke.name)
    .bind(&joke.content)
    .bind(joke.created_at)
    .bind(joke.updated_at)
    .execute(pool)
    .await?;

    info!("Joke created: {} ({})", joke.name, joke.id);
    Ok(joke)
}

/// Get joke by ID
pub async fn get_joke_by_id(pool: &SqlitePool, joke_id: &str) -> Result<Option<Joke>, sqlx::Error> {
    let row = sqlx::query_as::<_, JokeRow>(
        "SELECT id, jokester_id, name, content, created_at, updated_at
         FROM jokes WHERE id = ?1",
    )
    .bind(joke_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Joke::from))
}

/// Delete a joke. Returns false when no row matched.
pub async fn delete_joke(pool: &SqlitePool, joke_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jokes WHERE id = ?1")
        .bind(joke_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
