use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use hyper::{Method, StatusCode};
use serde_json::json;
use tracing::debug;

use crate::AppState;
use crate::handlers::http::utils::json_response;
use crate::handlers::http::{HttpRequest, HttpResponse, auth, jokes};

// ---------------------------------------------------------------------------
// Handler type alias
// ---------------------------------------------------------------------------

type RouteHandler = Box<
    dyn Fn(HttpRequest, AppState) -> Pin<Box<dyn Future<Output = Result<HttpResponse>> + Send>>
        + Send
        + Sync,
>;

// ---------------------------------------------------------------------------
// Path parameters
// ---------------------------------------------------------------------------

/// Values captured by `:name` segments, stored in the request extensions
/// before the handler runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

struct Route {
    method: Method,
    path: String,
    handler: RouteHandler,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.add(Method::GET, path, handler)
    }

    pub fn post<F, Fut>(self, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.add(Method::POST, path, handler)
    }

    fn add<F, Fut>(mut self, method: Method, path: &str, handler: F) -> Self
    where
        F: Fn(HttpRequest, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HttpResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler: Box::new(move |req, state| Box::pin(handler(req, state))),
        });
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(&self, mut req: HttpRequest, state: AppState) -> Result<HttpResponse> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method {
                continue;
            }
            let Some(params) = Self::extract_params(&route.path, &path) else {
                continue;
            };

            debug!("Routing {} {} to {}", method, path, route.path);
            req.extensions_mut().insert(params);
            return (route.handler)(req, state).await;
        }

        json_response::deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }

    // ── Path matching ─────────────────────────────────────────────────────────

    pub fn path_matches(route_path: &str, request_path: &str) -> bool {
        Self::extract_params(route_path, request_path).is_some()
    }

    /// Match segment by segment, capturing `:param` segments. A parameter
    /// never matches an empty segment. Values are taken as-is, without
    /// percent-decoding.
    pub fn extract_params(route_path: &str, request_path: &str) -> Option<PathParams> {
        // Strip query string from incoming request path before comparing.
        let clean = request_path.split('?').next().unwrap_or(request_path);

        if route_path == clean {
            return Some(PathParams::default());
        }

        let route_segs: Vec<&str> = route_path.split('/').collect();
        let path_segs: Vec<&str> = clean.split('/').collect();

        if route_segs.len() != path_segs.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (r, p) in route_segs.iter().zip(path_segs.iter()) {
            match r.strip_prefix(':') {
                Some(name) if !p.is_empty() => {
                    params.insert(name.to_string(), p.to_string());
                }
                Some(_) => return None,
                None if r == p => {}
                None => return None,
            }
        }
        Some(PathParams(params))
    }
}

// ---------------------------------------------------------------------------
// Application router
// ---------------------------------------------------------------------------

pub fn build_router() -> Router {
    Router::new()
        .get("/health", |_req, _state| async move {
            json_response::deliver_serialized_json(
                &json!({ "status": "success", "health": "ok" }),
                StatusCode::OK,
            )
        })
        .post("/login", auth::handle_login)
        .post("/logout", auth::handle_logout)
        .get("/jokes/:jokeId", jokes::handle_get_joke)
        .post("/jokes/:jokeId", jokes::handle_joke_action)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
