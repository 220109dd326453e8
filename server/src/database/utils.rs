use std::time::{SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp in seconds
pub fn get_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Generate a UUID-based identifier or session token
pub fn generate_uuid_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// PHC string stored in `users.password_hash` at registration. Argon2id with
/// default parameters and a fresh OS-random salt.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString},
    };
    use rand::rngs::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))
}

/// Check a login attempt against a stored PHC string. `Ok(false)` is a wrong
/// password; `Err` means the stored hash itself is unreadable.
pub fn verify_password(hash: &str, password: &str) -> anyhow::Result<bool> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Unix time at which a session created now stops resolving. Saturates at
/// `i64::MAX` rather than wrapping into the past.
pub fn calculate_expiry(duration_secs: i64) -> i64 {
    get_timestamp().saturating_add(duration_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp() {
        let ts = get_timestamp();
        assert!(ts > 0);
    }

    #[test]
    fn test_session_token() {
        let token1 = generate_uuid_token();
        let token2 = generate_uuid_token();
        assert_ne!(token1, token2);
        assert_eq!(token1.len(), 36); // hyphenated UUID
    }

    #[test]
    fn test_password_hashing() {
        let password = "twixrox";
        let hash = hash_password(password).unwrap();
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, password).unwrap());
        assert!(!verify_password(&hash, "wrong_password").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "twixrox").is_err());
    }

    #[test]
    fn test_expiry() {
        let now = get_timestamp();
        let expiry = calculate_expiry(3600);
        assert!(expiry >= now + 3600);
        assert!(expiry <= get_timestamp() + 3600);
    }

    #[test]
    fn test_expiry_saturates() {
        assert_eq!(calculate_expiry(i64::MAX), i64::MAX);
    }
}
