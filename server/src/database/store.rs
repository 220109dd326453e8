use anyhow::{Context, Result};
use async_trait::async_trait;
use shared::config::LiveConfig;
use shared::types::{Joke, NewJoke, Session, User};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::database::users::NewUser;
use crate::database::utils::{calculate_expiry, generate_uuid_token, get_timestamp};
use crate::database::{jokes, sessions, users, utils};
use crate::ports::{AuthService, JokeRepository, UserRepository};

/// SQLite-backed implementation of every delegate port.
///
/// Session lifetime is read from `config` per session, so a reload of
/// `[auth]` applies to the next login.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    config: LiveConfig,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool, config: LiveConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl JokeRepository for SqliteStore {
    async fn find_joke_by_id(&self, joke_id: &str) -> Result<Option<Joke>> {
        jokes::get_joke_by_id(&self.pool, joke_id)
            .await
            .with_context(|| format!("Failed to load joke {}", joke_id))
    }

    async fn create_joke(&self, new_joke: NewJoke) -> Result<Joke> {
        jokes::create_joke(&self.pool, new_joke)
            .await
            .context("Failed to insert joke")
    }

    async fn delete_joke(&self, joke_id: &str) -> Result<bool> {
        jokes::delete_joke(&self.pool, joke_id)
            .await
            .with_context(|| format!("Failed to delete joke {}", joke_id))
    }
}

#[async_trait]
impl UserRepository for SqliteStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        users::get_user_by_username(&self.pool, username)
            .await
            .context("Failed to look up user")
    }
}

#[async_trait]
impl AuthService for SqliteStore {
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = users::get_user_by_username(&self.pool, username)
            .await
            .context("Failed to look up user")?
        else {
            return Ok(None);
        };

        // Argon2 blocks for tens of milliseconds; run it off the async workers.
        let hash = user.password_hash.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || utils::verify_password(&hash, &password))
            .await
            .context("Password verification task failed")??;

        Ok(matches.then_some(user))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || utils::hash_password(&password))
            .await
            .context("Password hashing task failed")??;

        users::register_user(
            &self.pool,
            NewUser {
                username: username.to_string(),
                password_hash,
            },
        )
        .await
        .context("Failed to insert user")
    }

    async fn create_session(&self, user_id: &str) -> Result<Session> {
        let ttl_secs = self.config.read().await.auth.session_expiry_secs();
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);

        let session = Session {
            token: generate_uuid_token(),
            user_id: user_id.to_string(),
            created_at: get_timestamp(),
            expires_at: calculate_expiry(ttl_secs),
        };

        sessions::create_session(&self.pool, &session)
            .await
            .context("Failed to create session")?;

        info!("Session created: {}", session);
        Ok(session)
    }

    async fn current_user_id(&self, token: &str) -> Result<Option<String>> {
        let Some(session) = sessions::get_session(&self.pool, token)
            .await
            .context("Failed to look up session")?
        else {
            return Ok(None);
        };

        if session.is_expired_at(get_timestamp()) {
            let removed = sessions::cleanup_expired_sessions(&self.pool)
                .await
                .context("Failed to clean up expired sessions")?;
            debug!("Expired session presented; removed {} stale rows", removed);
            return Ok(None);
        }

        Ok(Some(session.user_id))
    }

    async fn destroy_session(&self, token: &str) -> Result<()> {
        sessions::delete_session(&self.pool, token)
            .await
            .context("Failed to delete session")
    }
}
