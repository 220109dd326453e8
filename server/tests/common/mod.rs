#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, header};
use server::AppState;
use server::database::{SqliteStore, connect, create_tables};
use server::handlers::http::routes::{Router, build_router};
use server::handlers::http::{HttpResponse, handle_request};
use server::ports::{AuthService, JokeRepository};
use shared::config::LiveConfig;
use shared::types::server_config::AppConfig;
use shared::types::{Joke, NewJoke, User};

pub const COOKIE: &str = "RJ_session";

pub struct TestApp {
    pub store: SqliteStore,
    pub state: AppState,
    pub router: Arc<Router>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let pool = connect("sqlite::memory:", 1).await.unwrap();
        create_tables(&pool).await.unwrap();
        let live_config = LiveConfig::new(config);
        let store = SqliteStore::new(pool, live_config.clone());
        let state = AppState::new(live_config, store.clone());
        Self {
            store,
            state,
            router: Arc::new(build_router()),
        }
    }

    pub async fn send(&self, req: Request<Full<Bytes>>) -> TestResponse {
        let res = handle_request(req, self.router.clone(), self.state.clone())
            .await
            .unwrap();
        TestResponse::read(res).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, path, token, "")).await
    }

    pub async fn post_form(&self, path: &str, token: Option<&str>, body: &str) -> TestResponse {
        self.send(request(Method::POST, path, token, body)).await
    }

    pub async fn user(&self, username: &str, password: &str) -> User {
        self.store.create_user(username, password).await.unwrap()
    }

    pub async fn joke(&self, name: &str, jokester_id: &str) -> Joke {
        self.store
            .create_joke(NewJoke {
                name: name.to_string(),
                content: format!("{} punchline", name),
                jokester_id: jokester_id.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let res = self
            .post_form(
                "/login",
                None,
                &format!("loginType=login&username={}&password={}", username, password),
            )
            .await;
        assert_eq!(res.status, StatusCode::FOUND, "login failed: {}", res.text());
        res.session_token().expect("login sets a session cookie")
    }
}

pub fn request(method: Method, path: &str, token: Option<&str>, body: &str) -> Request<Full<Bytes>> {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE, token));
    }
    builder.body(Full::new(Bytes::from(body.to_string()))).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: hyper::HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    async fn read(res: HttpResponse) -> Self {
        let (parts, body) = res.into_parts();
        let body = body.collect().await.unwrap().to_bytes();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    /// Token from `Set-Cookie: RJ_session=<token>; ...`
    pub fn session_token(&self) -> Option<String> {
        let cookie = self.set_cookie()?;
        let (pair, _) = cookie.split_once(';')?;
        let (name, value) = pair.split_once('=')?;
        (name == COOKIE && !value.is_empty()).then(|| value.to_string())
    }
}
