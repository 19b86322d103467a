//! Session lifecycle and dashboard routing over real HTTP

mod helpers;

use axum::http::StatusCode;
use helpers::{location, session_cookie, set_cookies, spawn_app, PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
async fn login_sets_session_and_me_returns_user() {
    let app = spawn_app().await;

    let response = app.post_login("mentor@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    let token = cookies
        .iter()
        .find(|c| c.starts_with("token="))
        .expect("session cookie");
    assert!(token.contains("HttpOnly"));
    assert!(token.contains("SameSite=Lax"));
    assert!(token.contains("Path=/"));
    assert!(cookies.iter().any(|c| c.starts_with("profile=")));

    let cookie = session_cookie(&response).unwrap();
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["redirect"], "/dashboard/mentor");
    assert_eq!(body["user"]["role"], "MENTOR");

    let response = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: Value = response.json().await.unwrap();
    assert_eq!(me["email"], "mentor@example.com");
    assert_eq!(me["id"], app.mentor.id.as_str());
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app().await;

    let response = app.post_login("member@example.com", "wrong-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&response).is_none());

    let response = app.post_login("nobody@example.com", PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Correct password, but the stored role has no dashboard
    let response = app.post_login(&app.roleless.email, PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let app = spawn_app().await;

    let response = app
        .post_json("/api/auth/login", &json!({ "email": "member@example.com" }), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/auth/login", &json!({ "email": " ", "password": PASSWORD }), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_without_session_redirects_to_login() {
    let app = spawn_app().await;

    let response = app.get("/api/auth/me", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/login"));

    let response = app.get("/api/auth/me", Some("token=not-a-jwt")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn logout_clears_cookies_and_redirects_home() {
    let app = spawn_app().await;
    let cookie = app.login_as(&app.member).await;

    let response = app
        .api_client
        .post(app.url("/api/logout"))
        .header(reqwest::header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/"));
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
        Some("no-store")
    );

    let cookies = set_cookies(&response);
    for name in ["token=", "profile="] {
        let cleared = cookies
            .iter()
            .find(|c| c.starts_with(name))
            .unwrap_or_else(|| panic!("{} not cleared", name));
        assert!(cleared.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn session_endpoint_sets_and_clears_cookie() {
    let app = spawn_app().await;
    let token = app.state.sessions.issue(&app.admin.id).unwrap();

    let response = app
        .post_json("/api/session", &json!({ "token": token }), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert_eq!(cookie, format!("token={}", token));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], true);

    // The stored token is a working session
    let response = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.post_json("/api/session", &json!({}), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "token is required");

    let response = app.delete("/api/session").await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookies(&response)
        .into_iter()
        .find(|c| c.starts_with("token="))
        .unwrap();
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn dashboards_route_by_role() {
    let app = spawn_app().await;

    for (user, path) in [
        (&app.admin, "/dashboard/admin"),
        (&app.mentor, "/dashboard/mentor"),
        (&app.member, "/dashboard/member"),
    ] {
        let cookie = app.login_as(user).await;

        let response = app.get("/dashboard", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response).as_deref(), Some(path));

        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Admins pass the mentor guard, members do not
    let admin = app.login_as(&app.admin).await;
    let response = app.get("/dashboard/mentor", Some(&admin)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let member = app.login_as(&app.member).await;
    let response = app.get("/dashboard/mentor", Some(&member)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}

#[tokio::test]
async fn unknown_dashboard_without_session_or_profile_goes_to_login() {
    let app = spawn_app().await;

    let response = app.get("/dashboard/parent", None).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/login"));
}
