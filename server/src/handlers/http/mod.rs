//! hyper adapter: turns HTTP requests into handler calls and handler
//! outcomes into responses.

pub mod auth;
pub mod jokes;
pub mod routes;
pub mod utils;

use std::convert::Infallible;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::combinators::{BoxBody, UnsyncBoxBody};
use hyper::body::Body;
use hyper::header::HeaderMap;
use hyper::{Request, Response};
use tracing::{debug, error};

use crate::AppState;
use crate::handlers::http::routes::Router;
use crate::handlers::http::utils::{get_cookie, internal_error_fallback};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Request body type every route handler receives.
pub type RequestBody = UnsyncBoxBody<Bytes, BoxError>;
pub type HttpRequest = Request<RequestBody>;
pub type HttpResponse = Response<BoxBody<Bytes, Infallible>>;

/// Entry point for one request. Never fails: handler errors are logged and
/// rendered as a generic 500 so the connection keeps serving.
pub async fn handle_request<B>(
    req: Request<B>,
    router: Arc<Router>,
    state: AppState,
) -> std::result::Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let req: HttpRequest = req.map(|body| body.map_err(Into::into).boxed_unsync());

    match router.route(req, state).await {
        Ok(response) => {
            debug!("{} {} -> {}", method, path, response.status());
            Ok(response)
        }
        Err(e) => {
            error!("Handler for {} {} failed: {:#}", method, path, e);
            Ok(utils::deliver_error_json(
                "INTERNAL_ERROR",
                "An internal error occurred",
                hyper::StatusCode::INTERNAL_SERVER_ERROR,
            )
            .unwrap_or_else(|_| internal_error_fallback()))
        }
    }
}

/// Resolve the session cookie to a user id. `None` when the cookie is absent,
/// unknown or expired.
pub async fn current_user_id(headers: &HeaderMap, state: &AppState) -> Result<Option<String>> {
    let cookie_name = state.config.read().await.auth.session_cookie_name.clone();

    let Some(token) = get_cookie(headers, &cookie_name) else {
        return Ok(None);
    };

    state
        .auth
        .current_user_id(&token)
        .await
        .context("Failed to resolve session cookie")
}
