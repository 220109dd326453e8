//! The login/register form action.
//!
//! Pure request logic: takes the decoded form plus the two delegates and
//! decides between a 400 body and a session + redirect. The HTTP adapter in
//! `handlers::http::auth` turns the outcome into a response.

use std::collections::HashMap;

use anyhow::{Context, Result};
use shared::types::login::{INCORRECT_COMBINATION, LOGIN_TYPE_INVALID, no_such_user, user_already_exists};
use shared::types::{ActionData, FieldErrors, LoginFields, LoginType, Session};
use shared::validation::{self, DEFAULT_REDIRECT};
use tracing::{info, warn};

use crate::ports::{AuthService, UserRepository};

/// Raw fields of the login form. `None` means the field was not submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub login_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub redirect_to: Option<String>,
}

impl LoginForm {
    /// Decode an `application/x-www-form-urlencoded` body. When a field is
    /// repeated the first value wins.
    pub fn from_urlencoded(body: &[u8]) -> Self {
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(body).into_owned() {
            params.entry(key).or_insert(value);
        }

        Self {
            login_type: params.remove("loginType"),
            username: params.remove("username"),
            password: params.remove("password"),
            redirect_to: params.remove("redirectTo"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoginOptions {
    /// Echo the submitted password in 400 bodies.
    pub echo_password: bool,
}

impl Default for LoginOptions {
    fn default() -> Self {
        Self {
            echo_password: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Re-render the form with these errors.
    BadRequest(ActionData),
    /// Set the session cookie and send the browser to `location`.
    Redirect { location: String, session: Session },
}

/// Run the login form action.
///
/// Validation and credential failures come back as `LoginOutcome::BadRequest`.
/// `Err` is reserved for delegate failures and maps to a 500.
pub async fn handle_login_action(
    form: LoginForm,
    users: &dyn UserRepository,
    auth: &dyn AuthService,
    options: LoginOptions,
) -> Result<LoginOutcome> {
    let LoginForm {
        login_type: Some(login_type),
        username: Some(username),
        password: Some(password),
        redirect_to,
    } = form
    else {
        warn!("Login form missing required fields");
        return Ok(LoginOutcome::BadRequest(ActionData::malformed()));
    };

    let redirect_to = validation::validate_redirect_target(redirect_to.as_deref()).to_string();

    let fields = LoginFields {
        login_type: login_type.clone(),
        username: username.clone(),
        password: options.echo_password.then(|| password.clone()),
    };

    let field_errors = FieldErrors {
        username: validation::validate_username(&username).err().map(String::from),
        password: validation::validate_password(&password).err().map(String::from),
    };
    if field_errors.has_errors() {
        warn!("Login form failed validation for user: {}", username);
        return Ok(LoginOutcome::BadRequest(ActionData::invalid_fields(
            field_errors,
            fields,
        )));
    }

    let Ok(login_type) = login_type.parse::<LoginType>() else {
        warn!("Unknown login type: {:?}", login_type);
        return Ok(LoginOutcome::BadRequest(ActionData::rejected(
            fields,
            LOGIN_TYPE_INVALID,
        )));
    };

    match login_type {
        LoginType::Login => {
            let existing = users
                .find_user_by_username(&username)
                .await
                .context("User lookup failed during login")?;
            if existing.is_none() {
                warn!("Login attempt for unknown user: {}", username);
                return Ok(LoginOutcome::BadRequest(ActionData::rejected(
                    fields,
                    no_such_user(&username),
                )));
            }

            let Some(user) = auth
                .verify_credentials(&username, &password)
                .await
                .context("Credential check failed")?
            else {
                warn!("Invalid password for user: {}", username);
                return Ok(LoginOutcome::BadRequest(ActionData::rejected(
                    fields,
                    INCORRECT_COMBINATION,
                )));
            };

            let session = auth
                .create_session(&user.id)
                .await
                .context("Failed to create session after login")?;

            info!("User logged in successfully: {}", user);
            Ok(LoginOutcome::Redirect {
                location: redirect_to,
                session,
            })
        }
        LoginType::Register => {
            let existing = users
                .find_user_by_username(&username)
                .await
                .context("User lookup failed during registration")?;
            if existing.is_some() {
                warn!("Registration attempt for taken username: {}", username);
                return Ok(LoginOutcome::BadRequest(ActionData::rejected(
                    fields,
                    user_already_exists(&username),
                )));
            }

            let user = auth
                .create_user(&username, &password)
                .await
                .context("Failed to create user")?;
            let session = auth
                .create_session(&user.id)
                .await
                .context("Failed to create session after registration")?;

            info!("User registered successfully: {}", user);
            Ok(LoginOutcome::Redirect {
                location: DEFAULT_REDIRECT.to_string(),
                session,
            })
        }
    }
}
