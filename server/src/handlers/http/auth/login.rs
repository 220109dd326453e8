use std::time::Duration;

use anyhow::{Context, Result};
use hyper::StatusCode;
use shared::types::ActionData;
use tracing::{info, warn};

use crate::AppState;
use crate::handlers::http::utils::{self, BodyError, MAX_FORM_BYTES};
use crate::handlers::http::{HttpRequest, HttpResponse};
use crate::handlers::login::{LoginForm, LoginOptions, LoginOutcome, handle_login_action};

/// `POST /login`: runs the login/register form action.
pub async fn handle_login(req: HttpRequest, state: AppState) -> Result<HttpResponse> {
    info!("Processing login request");

    let auth_config = state.config.read().await.auth.clone();

    let body = match utils::collect_body(req.into_body(), MAX_FORM_BYTES).await {
        Ok(body) => body,
        Err(BodyError::TooLarge(limit)) => {
            return utils::deliver_error_json(
                "PAYLOAD_TOO_LARGE",
                &format!("Form body must be under {} bytes", limit),
                StatusCode::PAYLOAD_TOO_LARGE,
            );
        }
        Err(e) => {
            warn!("Login body unreadable: {}", e);
            return utils::deliver_serialized_json(&ActionData::malformed(), StatusCode::BAD_REQUEST);
        }
    };

    let form = LoginForm::from_urlencoded(&body);
    let options = LoginOptions {
        echo_password: auth_config.echo_password_on_error,
    };

    match handle_login_action(form, state.users.as_ref(), state.auth.as_ref(), options).await? {
        LoginOutcome::BadRequest(data) => {
            utils::deliver_serialized_json(&data, StatusCode::BAD_REQUEST)
        }
        LoginOutcome::Redirect { location, session } => {
            let cookie = utils::create_persistent_cookie(
                &auth_config.session_cookie_name,
                &session.token,
                Duration::from_secs(auth_config.session_expiry_secs()),
                auth_config.secure_cookies,
            )
            .context("Failed to create session cookie")?;

            utils::deliver_redirect_with_cookie(&location, Some(cookie))
        }
    }
}
