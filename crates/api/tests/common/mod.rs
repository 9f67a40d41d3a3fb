#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use budgetra_api::config::ServerConfig;
use budgetra_api::router::build_app_router;
use budgetra_api::state::AppState;
use budgetra_auth::{
    AuthBackend, BootstrapHandle, InMemoryAuthBackend, SessionBootstrapper, SessionState,
    SessionStore, User,
};
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery staple";
const WAIT: Duration = Duration::from_secs(2);

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://localhost/budgetra_test".to_string(),
        supabase_url: "http://localhost:54321".to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        session_file: ".budgetra/test-session.json".into(),
        session_fetch_timeout_secs: 10,
        request_timeout_secs: 30,
        cors_origins: vec!["http://localhost:3000".parse().unwrap()],
    }
}

/// A pool that never connects, for tests that do not touch the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy("postgres://localhost:1/unused")
        .unwrap()
}

/// The full application wired to an in-memory auth backend, with the session
/// bootstrapper running.
pub struct TestApp {
    router: Router,
    pub backend: Arc<InMemoryAuthBackend>,
    pub session: SessionStore,
    pub shutdown: CancellationToken,
    bootstrap: Option<BootstrapHandle>,
}

impl TestApp {
    /// Start the app and wait for the initial session check to finish.
    pub async fn start(pool: PgPool) -> Self {
        Self::start_with(pool, Arc::new(InMemoryAuthBackend::new())).await
    }

    pub async fn start_with(pool: PgPool, backend: Arc<InMemoryAuthBackend>) -> Self {
        let app = Self::start_loading(pool, backend).await;
        app.session.wait_until_loaded().await;
        app
    }

    /// Start the app without waiting for the initial session check.
    pub async fn start_loading(pool: PgPool, backend: Arc<InMemoryAuthBackend>) -> Self {
        let config = test_config();
        let session = SessionStore::new();
        let bootstrap = SessionBootstrapper::new(backend.clone(), session.clone()).start();
        let shutdown = CancellationToken::new();

        let state = AppState {
            pool,
            config: Arc::new(config.clone()),
            auth: backend.clone(),
            session: session.clone(),
            shutdown: shutdown.clone(),
        };

        Self {
            router: build_app_router(state, &config),
            backend,
            session,
            shutdown,
            bootstrap: Some(bootstrap),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Register `email` and sign in through the backend, waiting until the
    /// store holds the new identity.
    pub async fn sign_in_as(&self, email: &str) -> User {
        self.backend.register(email, PASSWORD);
        let session = self
            .backend
            .sign_in_with_password(email, PASSWORD)
            .await
            .unwrap();
        let id = session.user.id;
        self.wait_for(|s| s.identity.as_ref().map(|u| u.id) == Some(id))
            .await;
        session.user
    }

    pub async fn sign_out(&self) {
        self.backend.sign_out().await.unwrap();
        self.wait_for(|s| s.identity.is_none()).await;
    }

    pub async fn wait_for(&self, done: impl FnMut(&SessionState) -> bool) -> SessionState {
        let mut rx = self.session.subscribe();
        let state = tokio::time::timeout(WAIT, rx.wait_for(done))
            .await
            .expect("timed out waiting for session state")
            .expect("session store closed")
            .clone();
        state
    }

    pub async fn shutdown(mut self) {
        if let Some(handle) = self.bootstrap.take() {
            handle.shutdown().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::delete(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::POST, uri, json).await
}

pub async fn put_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, json).await
}

async fn send_json(
    app: Router,
    method: Method,
    uri: &str,
    json: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body built from `fields`.
pub async fn post_form(app: Router, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
