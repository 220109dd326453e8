use std::fmt;

use serde::{Deserialize, Serialize};

/// A login session row.
///
/// `token` is the value carried in the session cookie. It is the bearer
/// secret, so `Display` leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user_id={}, created_at={}, expires_at={}",
            self.user_id, self.created_at, self.expires_at
        )
    }
}
