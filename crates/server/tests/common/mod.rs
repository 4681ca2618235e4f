//! Common test utilities for in-process API testing.
//!
//! The fixture builds the full router over in-memory stores, so tests
//! exercise the real handler stack without binding a port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use mangaverse_core::{
    seed_if_empty, Authenticator, CatalogStore, Config, SessionAuthenticator, SessionStore,
    SqliteCatalog, SqliteThreadStore, SqliteUserStore, ThreadStore, UserStore,
};
use mangaverse_server::api::create_router;
use mangaverse_server::state::AppState;

/// A response, pre-collected for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Value of the Set-Cookie header, if any.
    pub set_cookie: Option<String>,
}

/// In-process server fixture.
pub struct TestApp {
    router: Router,
    pub catalog: Arc<dyn CatalogStore>,
}

impl TestApp {
    /// Fresh app over empty stores.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// App with the demo dataset seeded.
    pub fn seeded() -> Self {
        Self::build(true)
    }

    fn build(seed: bool) -> Self {
        let config = Config::default();

        let catalog: Arc<dyn CatalogStore> = Arc::new(SqliteCatalog::in_memory().unwrap());
        let threads: Arc<dyn ThreadStore> = Arc::new(SqliteThreadStore::in_memory().unwrap());
        let users: Arc<dyn UserStore> = Arc::new(SqliteUserStore::in_memory().unwrap());

        if seed {
            seed_if_empty(
                catalog.as_ref(),
                users.as_ref(),
                threads.as_ref(),
                chrono::Utc::now(),
            )
            .unwrap();
        }

        let sessions = Arc::new(SessionStore::new(config.session.ttl_minutes));
        let authenticator: Arc<dyn Authenticator> = Arc::new(SessionAuthenticator::new(
            Arc::clone(&sessions),
            config.session.cookie_name.clone(),
        ));

        let state = Arc::new(AppState::new(
            config,
            Arc::clone(&catalog),
            threads,
            users,
            sessions,
            authenticator,
        ));

        TestApp {
            router: create_router(state),
            catalog,
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        TestResponse {
            status,
            body,
            set_cookie,
        }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.get_with_cookie(path, None).await
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.post_with_cookie(path, body, None).await
    }

    pub async fn post_with_cookie(
        &self,
        path: &str,
        body: Value,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn delete_with_cookie(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method("DELETE").uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Sign up a user and return the session cookie pair for requests.
    pub async fn signup(&self, username: &str) -> String {
        let response = self
            .post(
                "/api/v1/auth/signup",
                serde_json::json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password123",
                    "confirmPassword": "password123",
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        session_cookie(&response)
    }
}

/// Extract the bare `name=token` pair from a Set-Cookie header.
pub fn session_cookie(response: &TestResponse) -> String {
    response
        .set_cookie
        .as_ref()
        .expect("expected a Set-Cookie header")
        .split(';')
        .next()
        .unwrap()
        .to_string()
}
