//! In-memory delegates for handler unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use shared::types::{Joke, NewJoke, Session, User};

use crate::ports::{AuthService, JokeRepository, UserRepository};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, User>,
    jokes: HashMap<String, Joke>,
    sessions: HashMap<String, Session>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

/// Stores users, jokes and sessions in plain maps. "Hashes" are the password
/// with a `hashed:` prefix. A failing store errors on every call.
#[derive(Debug, Default)]
pub struct FakeStore {
    tables: Mutex<Tables>,
    failing: bool,
}

impl FakeStore {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn add_user(&self, username: &str, password: &str) -> User {
        let mut tables = self.tables.lock().unwrap();
        let user = User {
            id: tables.next_id("user"),
            username: username.to_string(),
            password_hash: format!("hashed:{}", password),
            created_at: 0,
        };
        tables.users.insert(user.username.clone(), user.clone());
        user
    }

    pub fn add_joke(&self, name: &str, jokester_id: &str) -> Joke {
        let mut tables = self.tables.lock().unwrap();
        let joke = Joke {
            id: tables.next_id("joke"),
            name: name.to_string(),
            content: format!("{} content", name),
            jokester_id: jokester_id.to_string(),
            created_at: 0,
            updated_at: 0,
        };
        tables.jokes.insert(joke.id.clone(), joke.clone());
        joke
    }

    pub fn user(&self, username: &str) -> Option<User> {
        self.tables.lock().unwrap().users.get(username).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn session_count(&self) -> usize {
        self.tables.lock().unwrap().sessions.len()
    }

    pub fn has_joke(&self, joke_id: &str) -> bool {
        self.tables.lock().unwrap().jokes.contains_key(joke_id)
    }

    fn check(&self) -> Result<()> {
        if self.failing {
            bail!("store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl JokeRepository for FakeStore {
    async fn find_joke_by_id(&self, joke_id: &str) -> Result<Option<Joke>> {
        self.check()?;
        Ok(self.tables.lock().unwrap().jokes.get(joke_id).cloned())
    }

    async fn create_joke(&self, new_joke: NewJoke) -> Result<Joke> {
        self.check()?;
        Ok(self.add_joke(&new_joke.name, &new_joke.jokester_id))
    }

    async fn delete_joke(&self, joke_id: &str) -> Result<bool> {
        self.check()?;
        Ok(self.tables.lock().unwrap().jokes.remove(joke_id).is_some())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.check()?;
        Ok(self.user(username))
    }
}

#[async_trait]
impl AuthService for FakeStore {
    async fn verify_credentials(&self, username: &str, password: &str) -> Result<Option<User>> {
        self.check()?;
        Ok(self
            .user(username)
            .filter(|u| u.password_hash == format!("hashed:{}", password)))
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User> {
        self.check()?;
        Ok(self.add_user(username, password))
    }

    async fn create_session(&self, user_id: &str) -> Result<Session> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let session = Session {
            token: tables.next_id("token"),
            user_id: user_id.to_string(),
            created_at: 0,
            expires_at: i64::MAX,
        };
        tables.sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn current_user_id(&self, token: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .unwrap()
            .sessions
            .get(token)
            .map(|s| s.user_id.clone()))
    }

    async fn destroy_session(&self, token: &str) -> Result<()> {
        self.check()?;
        self.tables.lock().unwrap().sessions.remove(token);
        Ok(())
    }
}
