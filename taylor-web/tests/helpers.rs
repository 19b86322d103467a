//! Integration test helpers
//!
//! Spawns the full application on an ephemeral port with a seeded user
//! directory, plus an optional mock upstream API.

#![allow(dead_code)]

use axum::{
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use taylor_core::{CatalogItem, Role};
use taylor_web::{
    auth::{MemoryUserDirectory, UserRecord},
    AppState, WebConfig,
};
use tokio::net::TcpListener;

// Ensure tracing is only initialized once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub const PASSWORD: &str = "test_password_123";

/// Seeded user
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: Option<String>,
}

/// Running application instance
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub state: AppState,
    pub admin: TestUser,
    pub mentor: TestUser,
    pub member: TestUser,
    pub roleless: TestUser,
    _catalog_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_login(&self, email: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Log in and return the `token=...` cookie pair
    pub async fn login_as(&self, user: &TestUser) -> String {
        let response = self.post_login(&user.email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::OK, "login failed for {}", user.email);
        session_cookie(&response).expect("login did not set a session cookie")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.api_client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &Value,
        cookie: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self.api_client.post(self.url(path)).json(body);
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request.send().await.expect("Failed to execute request.")
    }

    /// POST an arbitrary body with the given content type
    pub async fn post_raw(
        &self,
        path: &str,
        content_type: &str,
        body: &'static str,
        cookie: Option<&str>,
    ) -> reqwest::Response {
        let mut request = self
            .api_client
            .post(self.url(path))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        if let Some(cookie) = cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request.send().await.expect("Failed to execute request.")
    }

    pub async fn delete(&self, path: &str) -> reqwest::Response {
        self.api_client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// All `Set-Cookie` headers of a response
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// The `token=...` pair from a response's session cookie
pub fn session_cookie(response: &reqwest::Response) -> Option<String> {
    set_cookies(response)
        .into_iter()
        .find(|cookie| cookie.starts_with("token="))
        .and_then(|cookie| cookie.split(';').next().map(str::to_string))
}

pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub fn catalog_item(id: &str, retailer: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        name: format!("Item {}", id),
        brand: "Silver Cross".to_string(),
        price: 129.99,
        category: "Pushchairs".to_string(),
        image_url: String::new(),
        retailer: retailer.to_string(),
        url: String::new(),
        notes: String::new(),
    }
}

fn seeded(email: &str, role: Role) -> (UserRecord, TestUser) {
    let record = UserRecord::new(email, Some(email.to_string()), role)
        .with_password(PASSWORD)
        .unwrap();
    let user = TestUser {
        id: record.id.clone(),
        email: email.to_string(),
        role: record.role.clone(),
    };
    (record, user)
}

/// Spawn the app against the given upstream URL
pub async fn spawn_app_with_upstream(upstream_url: &str) -> TestApp {
    LazyLock::force(&TRACING);

    let catalog_dir = tempfile::tempdir().unwrap();
    let catalog_path: PathBuf = catalog_dir.path().join("catalog.json");
    taylor_catalog::CatalogSnapshot::new(vec![
        catalog_item("silvercross-wave", "SilverCross"),
        catalog_item("albeebaby-glider", "AlbeeBaby"),
    ])
    .save(&catalog_path)
    .unwrap();

    let (admin_record, admin) = seeded("admin@example.com", Role::Admin);
    let (mentor_record, mentor) = seeded("mentor@example.com", Role::Mentor);
    let (member_record, member) = seeded("member@example.com", Role::Member);
    let (mut roleless_record, mut roleless) = seeded("guest@example.com", Role::Member);
    roleless_record.role = Some("GUEST".to_string());
    roleless.role = roleless_record.role.clone();

    let directory = MemoryUserDirectory::from_records([
        admin_record,
        mentor_record,
        member_record,
        roleless_record,
    ]);

    let config = WebConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        dev_mode: true,
        upstream_url: upstream_url.to_string(),
        upstream_timeout_secs: 2,
        catalog_path: Some(catalog_path),
        ..WebConfig::default()
    };

    let state = AppState::with_user_directory(config, Arc::new(directory)).unwrap();
    let app = taylor_web::create_app(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: client,
        state,
        admin,
        mentor,
        member,
        roleless,
        _catalog_dir: catalog_dir,
    }
}

/// Spawn the app with an upstream that is not listening
pub async fn spawn_app() -> TestApp {
    spawn_app_with_upstream(&unreachable_url()).await
}

/// URL of a loopback port nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Requests received by the mock upstream
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub cookie: Option<String>,
    pub body: Value,
}

/// Mock upstream API
pub struct MockUpstream {
    pub address: String,
    pub requests: Arc<tokio::sync::Mutex<Vec<RecordedRequest>>>,
}

/// Spawn a mock upstream. `/api/messages` and `/api/rsvp` echo the request,
/// `/api/polls` answers 422, and `/api/polls/vote` returns a non-JSON body.
pub async fn spawn_upstream() -> MockUpstream {
    let requests: Arc<tokio::sync::Mutex<Vec<RecordedRequest>>> = Arc::default();

    let record = |path: &'static str,
                  status: StatusCode,
                  requests: Arc<tokio::sync::Mutex<Vec<RecordedRequest>>>| {
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let requests = requests.clone();
            async move {
                let cookie = headers
                    .get("cookie")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string);
                requests.lock().await.push(RecordedRequest {
                    path: path.to_string(),
                    cookie: cookie.clone(),
                    body: body.clone(),
                });
                (
                    status,
                    Json(json!({ "path": path, "cookie": cookie, "received": body })),
                )
            }
        })
    };

    let app = Router::new()
        .route(
            "/api/messages",
            record("/api/messages", StatusCode::CREATED, requests.clone()),
        )
        .route(
            "/api/rsvp",
            record("/api/rsvp", StatusCode::OK, requests.clone()),
        )
        .route(
            "/api/polls",
            record("/api/polls", StatusCode::UNPROCESSABLE_ENTITY, requests.clone()),
        )
        .route(
            "/api/polls/vote",
            post(|| async { (StatusCode::OK, "<html>maintenance</html>") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { address, requests }
}
