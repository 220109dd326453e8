use std::fmt;

use serde::{Deserialize, Serialize};

/// A registered account.
///
/// `password_hash` holds an Argon2 PHC string and is never serialized, so a
/// `User` can be handed to a response body without leaking the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: i64,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id={}, username={}", self.id, self.username)
    }
}
