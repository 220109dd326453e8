//! Delegate interfaces the request handlers depend on.
//!
//! Handlers only ever see these traits, so tests can swap the SQLite store for
//! in-memory fakes. Every method is async and reports unexpected failures as
//! `anyhow::Error`; "not found" is always `Ok(None)`, never an error.

use anyhow::Result;
use async_trait::async_trait;
use shared::types::{Joke, NewJoke, Session, User};

#[async_trait]
pub trait JokeRepository: Send + Sync {
    async fn find_joke_by_id(&self, joke_id: &str) -> Result<Option<Joke>>;

    async fn create_joke(&self, new_joke: NewJoke) -> Result<Joke>;

    /// Returns false when nothing was deleted.
    async fn delete_joke(&self, joke_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// `Some(user)` only when the user exists and the password matches.
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>>;

    /// Hash the password and persist the user in one atomic insert.
    async fn create_user(&self, username: &str, password: &str) -> Result<User>;

    async fn create_session(&self, user_id: &str) -> Result<Session>;

    /// Resolve a session token to its user. Unknown or expired tokens give `None`.
    async fn current_user_id(&self, token: &str) -> Result<Option<String>>;

    async fn destroy_session(&self, token: &str) -> Result<()>;
}
