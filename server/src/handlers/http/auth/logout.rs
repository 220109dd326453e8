use anyhow::{Context, Result};
use tracing::info;

use crate::AppState;
use crate::handlers::http::utils;
use crate::handlers::http::{HttpRequest, HttpResponse};

/// `POST /logout`: drops the session row and clears the cookie.
pub async fn handle_logout(req: HttpRequest, state: AppState) -> Result<HttpResponse> {
    let (cookie_name, secure) = {
        let config = state.config.read().await;
        (
            config.auth.session_cookie_name.clone(),
            config.auth.secure_cookies,
        )
    };

    if let Some(token) = utils::get_cookie(req.headers(), &cookie_name) {
        state
            .auth
            .destroy_session(&token)
            .await
            .context("Failed to destroy session")?;
        info!("User logged out");
    }

    let clear_cookie =
        utils::delete_cookie(&cookie_name, secure).context("Failed to build logout cookie")?;

    utils::deliver_redirect_with_cookie("/", Some(clear_cookie))
}
