use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Form-level messages
// ---------------------------------------------------------------------------

pub const FORM_NOT_SUBMITTED: &str = "Form not submitted correctly.";
pub const LOGIN_TYPE_INVALID: &str = "Login type invalid";
pub const INCORRECT_COMBINATION: &str = "Username/Password combination is incorrect";

pub fn no_such_user(username: &str) -> String {
    format!("No User with username {} exists", username)
}

pub fn user_already_exists(username: &str) -> String {
    format!("User with username {} already exists", username)
}

// ---------------------------------------------------------------------------
// Login type
// ---------------------------------------------------------------------------

/// Which branch of the login form the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginType {
    Login,
    Register,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown login type: {0:?}")]
pub struct UnknownLoginType(pub String);

impl FromStr for LoginType {
    type Err = UnknownLoginType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "register" => Ok(Self::Register),
            other => Err(UnknownLoginType(other.to_string())),
        }
    }
}

impl fmt::Display for LoginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => write!(f, "login"),
            Self::Register => write!(f, "register"),
        }
    }
}

// ---------------------------------------------------------------------------
// 400 response body
// ---------------------------------------------------------------------------

/// Per-field validation messages. `None` means the field passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn has_errors(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

/// The submitted values, echoed back so the form can be refilled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginFields {
    pub login_type: String,
    pub username: String,
    /// Absent when the server is configured not to echo passwords.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body of every 400 response from the login action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<LoginFields>,
}

impl ActionData {
    /// The form itself was malformed; nothing is echoed back.
    pub fn malformed() -> Self {
        Self {
            form_error: Some(FORM_NOT_SUBMITTED.to_string()),
            ..Self::default()
        }
    }

    pub fn invalid_fields(field_errors: FieldErrors, fields: LoginFields) -> Self {
        Self {
            form_error: None,
            field_errors: Some(field_errors),
            fields: Some(fields),
        }
    }

    pub fn rejected(fields: LoginFields, form_error: impl Into<String>) -> Self {
        Self {
            form_error: Some(form_error.into()),
            field_errors: None,
            fields: Some(fields),
        }
    }
}
