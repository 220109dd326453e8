use std::collections::HashMap;

use anyhow::{Result, anyhow};
use hyper::StatusCode;
use shared::types::ErrorResponse;
use tracing::{error, info};

use crate::AppState;
use crate::handlers::http::routes::PathParams;
use crate::handlers::http::utils::{self, BodyError, MAX_FORM_BYTES};
use crate::handlers::http::{HttpRequest, HttpResponse, current_user_id};
use crate::handlers::joke::{JokeError, delete_joke_action, load_joke};

fn joke_id(req: &HttpRequest) -> Result<String> {
    req.extensions()
        .get::<PathParams>()
        .and_then(|params| params.get("jokeId"))
        .map(str::to_string)
        .ok_or_else(|| anyhow!("jokeId path parameter missing"))
}

fn deliver_joke_error(err: &JokeError) -> Result<HttpResponse> {
    let mut body = ErrorResponse::new(err.code(), &err.boundary_message());
    if let JokeError::NotFound { .. } = err {
        body = body.with_detail(&err.to_string());
    }
    utils::deliver_error_response(&body, err.status())
}

/// `GET /jokes/:jokeId`
pub async fn handle_get_joke(req: HttpRequest, state: AppState) -> Result<HttpResponse> {
    let joke_id = joke_id(&req)?;

    let viewer = match current_user_id(req.headers(), &state).await {
        Ok(viewer) => viewer,
        Err(e) => {
            error!("Session lookup failed while loading joke {}: {:#}", joke_id, e);
            return deliver_joke_error(&JokeError::Internal {
                joke_id,
                detail: format!("{:#}", e),
            });
        }
    };

    match load_joke(&joke_id, viewer.as_deref(), state.jokes.as_ref()).await {
        Ok(view) => {
            info!("Joke {} served (owner: {})", joke_id, view.is_owner);
            let response = utils::deliver_serialized_json(&view, StatusCode::OK)?;
            Ok(utils::add_no_cache_headers(response))
        }
        Err(e) => deliver_joke_error(&e),
    }
}

/// `POST /jokes/:jokeId`: form actions on a single joke. Only
/// `_method=delete` is supported.
pub async fn handle_joke_action(req: HttpRequest, state: AppState) -> Result<HttpResponse> {
    let joke_id = joke_id(&req)?;
    let (parts, body) = req.into_parts();

    let body = match utils::collect_body(body, MAX_FORM_BYTES).await {
        Ok(body) => body,
        Err(BodyError::TooLarge(limit)) => {
            return utils::deliver_error_json(
                "PAYLOAD_TOO_LARGE",
                &format!("Form body must be under {} bytes", limit),
                StatusCode::PAYLOAD_TOO_LARGE,
            );
        }
        Err(e) => return Err(anyhow!(e)),
    };

    let mut form: HashMap<String, String> = HashMap::new();
    for (key, value) in form_urlencoded::parse(&body).into_owned() {
        form.entry(key).or_insert(value);
    }

    let viewer = current_user_id(&parts.headers, &state).await?;

    match delete_joke_action(
        &joke_id,
        form.get("_method").map(String::as_str),
        viewer.as_deref(),
        state.jokes.as_ref(),
    )
    .await
    {
        Ok(location) => utils::deliver_redirect(location),
        Err(e) => utils::deliver_error_json(e.code(), &e.message(), e.status()),
    }
}
