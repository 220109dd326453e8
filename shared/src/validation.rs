//! Field checks for the login form.
//!
//! Every function here is pure: failures come back as values and nothing is
//! logged or thrown.

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 6;

pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters long";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

/// Where a redirect goes when the requested target is not allowed.
pub const DEFAULT_REDIRECT: &str = "/jokes";

/// The only destinations a login may redirect to.
pub const REDIRECT_ALLOW_LIST: [&str; 3] = ["/jokes", "/", "https://remix.run"];

/// Validate username length
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(USERNAME_TOO_SHORT);
    }
    Ok(())
}

/// Validate password length
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(PASSWORD_TOO_SHORT);
    }
    Ok(())
}

/// Return `candidate` if it is on the allow-list, otherwise [`DEFAULT_REDIRECT`].
///
/// Comparison is exact: no trimming, no case folding, no prefix matching, so
/// `/jokes/../evil` and `//evil.com` both fall back to the default.
pub fn validate_redirect_target(candidate: Option<&str>) -> &str {
    match candidate {
        Some(target) if REDIRECT_ALLOW_LIST.contains(&target) => target,
        _ => DEFAULT_REDIRECT,
    }
}
