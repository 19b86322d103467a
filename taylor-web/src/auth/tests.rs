//! Tests for session resolution and role guards

use super::*;
use crate::{AppState, WebConfig};
use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{header, HeaderValue, Method, Request, StatusCode},
};
use std::sync::Arc;

struct Fixture {
    state: AppState,
    admin: String,
    mentor: String,
    member: String,
    roleless: String,
}

/// State with one user per role plus one whose stored role is unknown
async fn fixture() -> Fixture {
    let admin = UserRecord::new("admin@example.com", Some("Ada".to_string()), Role::Admin);
    let mentor = UserRecord::new("mentor@example.com", None, Role::Mentor);
    let member = UserRecord::new("member@example.com", Some("Mae".to_string()), Role::Member);
    let mut roleless = UserRecord::new("guest@example.com", None, Role::Member);
    roleless.role = Some("GUEST".to_string());

    let ids = (
        admin.id.clone(),
        mentor.id.clone(),
        member.id.clone(),
        roleless.id.clone(),
    );
    let directory = MemoryUserDirectory::from_records([admin, mentor, member, roleless]);

    let config = WebConfig {
        dev_mode: true,
        session_secret: "auth-test-secret".to_string(),
        ..WebConfig::default()
    };
    let state = AppState::with_user_directory(config, Arc::new(directory)).unwrap();

    let token = |id: &str| state.sessions.issue(id).unwrap();
    Fixture {
        admin: token(&ids.0),
        mentor: token(&ids.1),
        member: token(&ids.2),
        roleless: token(&ids.3),
        state,
    }
}

/// Helper function to create test request parts with a cookie header
fn parts_with_cookie(cookie: Option<&str>) -> axum::http::request::Parts {
    let mut request = Request::builder()
        .method(Method::GET)
        .uri("/test")
        .body(Body::empty())
        .unwrap();

    if let Some(cookie) = cookie {
        request
            .headers_mut()
            .insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    }

    request.into_parts().0
}

fn is_login_redirect(redirect: AuthRedirect) -> bool {
    let response = redirect.into_response();
    response.status() == StatusCode::TEMPORARY_REDIRECT
        && response.headers().get(header::LOCATION).unwrap() == "/login"
}

#[tokio::test]
async fn test_require_member_accepts_every_role() {
    let f = fixture().await;

    for (token, role) in [
        (&f.member, Role::Member),
        (&f.mentor, Role::Mentor),
        (&f.admin, Role::Admin),
    ] {
        let user = require_member(&f.state, Some(token.as_str())).await.unwrap();
        assert_eq!(user.role, role);
    }
}

#[tokio::test]
async fn test_require_member_without_session_redirects() {
    let f = fixture().await;

    let result = require_member(&f.state, None).await;
    assert!(is_login_redirect(result.unwrap_err()));
}

#[tokio::test]
async fn test_invalid_sessions_are_treated_as_absent() {
    let f = fixture().await;

    let forged = SessionSigner::new("other-secret", 3600).issue("anyone").unwrap();
    let unknown_user = f.state.sessions.issue("deleted-user").unwrap();

    for token in ["", "garbage", forged.as_str(), unknown_user.as_str(), f.roleless.as_str()] {
        assert!(
            require_user(&f.state, Some(token)).await.is_err(),
            "token {:?} should not resolve",
            token
        );
    }
}

#[tokio::test]
async fn test_require_role_is_hierarchical() {
    let f = fixture().await;

    assert!(require_role(&f.state, Some(f.admin.as_str()), Role::Mentor).await.is_ok());
    assert!(require_role(&f.state, Some(f.mentor.as_str()), Role::Mentor).await.is_ok());
    assert!(require_role(&f.state, Some(f.member.as_str()), Role::Mentor).await.is_err());
    assert!(require_role(&f.state, Some(f.mentor.as_str()), Role::Admin).await.is_err());
}

#[tokio::test]
async fn test_extractors_read_the_session_cookie() {
    let f = fixture().await;

    let mut parts = parts_with_cookie(Some(&format!("theme=dark; token={}", f.mentor)));
    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &f.state)
        .await
        .unwrap();
    assert_eq!(user.email, "mentor@example.com");

    let mut parts = parts_with_cookie(Some(&format!("token={}", f.mentor)));
    assert!(RequireMentor::from_request_parts(&mut parts, &f.state)
        .await
        .is_ok());
    assert!(RequireAdmin::from_request_parts(&mut parts, &f.state)
        .await
        .is_err());
}

#[tokio::test]
async fn test_optional_user() {
    let f = fixture().await;

    let mut parts = parts_with_cookie(None);
    let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &f.state)
        .await
        .unwrap();
    assert!(user.is_none());

    let mut parts = parts_with_cookie(Some(&format!("token={}", f.admin)));
    let OptionalUser(user) = OptionalUser::from_request_parts(&mut parts, &f.state)
        .await
        .unwrap();
    assert_eq!(user.unwrap().role, Role::Admin);
}

#[tokio::test]
async fn test_empty_token_cookie_is_ignored() {
    let f = fixture().await;
    let jar = CookieJar::from_headers(&parts_with_cookie(Some("token=")).headers);
    assert!(session_token(&jar).is_none());
    assert!(require_user(&f.state, session_token(&jar).as_deref())
        .await
        .is_err());
}
