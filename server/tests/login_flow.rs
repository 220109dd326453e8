mod common;

use common::{COOKIE, TestApp};
use hyper::StatusCode;
use server::ports::{AuthService, UserRepository};
use shared::types::server_config::AppConfig;

#[tokio::test]
async fn login_sets_cookie_and_redirects_to_requested_target() {
    let app = TestApp::new().await;
    let kody = app.user("kody", "twixrox").await;

    let res = app
        .post_form(
            "/login",
            None,
            "loginType=login&username=kody&password=twixrox&redirectTo=https%3A%2F%2Fremix.run",
        )
        .await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("https://remix.run"));

    let cookie = res.set_cookie().unwrap();
    assert!(cookie.starts_with(&format!("{}=", COOKIE)));
    assert!(cookie.contains("; Max-Age=2592000"));
    assert!(cookie.contains("; Path=/"));
    assert!(cookie.contains("; HttpOnly"));
    assert!(cookie.contains("; SameSite=Lax"));
    assert!(!cookie.contains("Secure"));

    let token = res.session_token().unwrap();
    assert_eq!(app.store.current_user_id(&token).await.unwrap(), Some(kody.id));
}

#[tokio::test]
async fn redirect_outside_allow_list_falls_back_to_jokes() {
    let app = TestApp::new().await;
    app.user("kody", "twixrox").await;

    for target in ["https%3A%2F%2Fevil.example", "%2Fjokes%2F..%2Fadmin", "%2F%2Fevil.example"] {
        let res = app
            .post_form(
                "/login",
                None,
                &format!(
                    "loginType=login&username=kody&password=twixrox&redirectTo={}",
                    target
                ),
            )
            .await;
        assert_eq!(res.status, StatusCode::FOUND);
        assert_eq!(res.location(), Some("/jokes"), "target {}", target);
    }
}

#[tokio::test]
async fn missing_redirect_defaults_to_jokes() {
    let app = TestApp::new().await;
    app.user("kody", "twixrox").await;

    let res = app
        .post_form("/login", None, "loginType=login&username=kody&password=twixrox")
        .await;
    assert_eq!(res.location(), Some("/jokes"));
}

#[tokio::test]
async fn unknown_user_gets_400_without_cookie() {
    let app = TestApp::new().await;

    let res = app
        .post_form("/login", None, "loginType=login&username=ghost&password=boo123")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.set_cookie().is_none());
    let json = res.json();
    assert_eq!(json["formError"], "No User with username ghost exists");
    assert_eq!(json["fields"]["loginType"], "login");
    assert_eq!(json["fields"]["username"], "ghost");
    assert_eq!(json["fields"]["password"], "boo123");
}

#[tokio::test]
async fn wrong_password_gets_400_and_no_session() {
    let app = TestApp::new().await;
    app.user("kody", "twixrox").await;

    let res = app
        .post_form("/login", None, "loginType=login&username=kody&password=wrongpw")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.set_cookie().is_none());
    assert_eq!(res.json()["formError"], "Username/Password combination is incorrect");
}

#[tokio::test]
async fn register_creates_hashed_user_and_redirects_to_jokes() {
    let app = TestApp::new().await;

    let res = app
        .post_form(
            "/login",
            None,
            "loginType=register&username=newbie&password=secret1&redirectTo=%2F",
        )
        .await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/jokes"));

    let user = app.store.find_user_by_username("newbie").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "secret1");
    assert!(!user.password_hash.contains("secret1"));

    let token = res.session_token().unwrap();
    assert_eq!(app.store.current_user_id(&token).await.unwrap(), Some(user.id));
}

#[tokio::test]
async fn register_taken_username_gets_400() {
    let app = TestApp::new().await;
    app.user("kody", "twixrox").await;

    let res = app
        .post_form("/login", None, "loginType=register&username=kody&password=another1")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["formError"], "User with username kody already exists");
}

#[tokio::test]
async fn missing_field_gets_form_not_submitted() {
    let app = TestApp::new().await;

    let res = app.post_form("/login", None, "loginType=login&username=kody").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let json = res.json();
    assert_eq!(json["formError"], "Form not submitted correctly.");
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn field_errors_are_reported_together() {
    let app = TestApp::new().await;

    let res = app
        .post_form("/login", None, "loginType=login&username=ab&password=123")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let json = res.json();
    assert_eq!(
        json["fieldErrors"]["username"],
        "Username must be at least 3 characters long"
    );
    assert_eq!(json["fieldErrors"]["password"], "Password must be at least 6 characters");
    assert!(json.get("formError").is_none());
}

#[tokio::test]
async fn invalid_login_type_gets_400() {
    let app = TestApp::new().await;

    let res = app
        .post_form("/login", None, "loginType=sudo&username=kody&password=twixrox")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["formError"], "Login type invalid");
}

#[tokio::test]
async fn password_echo_can_be_disabled() {
    let mut config = AppConfig::default();
    config.auth.echo_password_on_error = false;
    let app = TestApp::with_config(config).await;

    let res = app
        .post_form("/login", None, "loginType=login&username=ghost&password=boo123")
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["fields"].get("password").is_none());
}

#[tokio::test]
async fn secure_cookies_add_secure_flag() {
    let mut config = AppConfig::default();
    config.auth.secure_cookies = true;
    let app = TestApp::with_config(config).await;
    app.user("kody", "twixrox").await;

    let res = app
        .post_form("/login", None, "loginType=login&username=kody&password=twixrox")
        .await;
    assert!(res.set_cookie().unwrap().ends_with("; Secure"));
}

#[tokio::test]
async fn oversized_form_is_rejected() {
    let app = TestApp::new().await;
    let body = format!(
        "loginType=login&username=kody&password={}",
        "x".repeat(64 * 1024)
    );

    let res = app.post_form("/login", None, &body).await;
    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn logout_clears_cookie_and_invalidates_session() {
    let app = TestApp::new().await;
    app.user("kody", "twixrox").await;
    let token = app.login("kody", "twixrox").await;

    let res = app.post_form("/logout", Some(&token), "").await;

    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/"));
    let cookie = res.set_cookie().unwrap();
    assert!(cookie.starts_with(&format!("{}=;", COOKIE)));
    assert!(cookie.contains("Max-Age=0"));
    assert_eq!(app.store.current_user_id(&token).await.unwrap(), None);
}

#[tokio::test]
async fn logout_without_session_still_redirects() {
    let app = TestApp::new().await;

    let res = app.post_form("/logout", None, "").await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), Some("/"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let app = TestApp::new().await;

    let res = app.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["health"], "ok");

    let res = app.get("/nowhere", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["message"], "Endpoint not found");

    let res = app.get("/login", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
