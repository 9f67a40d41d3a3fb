//! HTTP client for a hosted GoTrue auth API (`{project_url}/auth/v1`).
//!
//! Keeps the issued session in memory and in a [`SessionStorage`], refreshes
//! it when it is about to expire, and reports every transition on its
//! [`AuthEvents`] channel.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::backend::{AuthBackend, AuthEvents, AuthSubscription};
use crate::error::AuthError;
use crate::session::{AuthChangeEvent, AuthStateChange, Session, SignUpOutcome, User};
use crate::storage::SessionStorage;

/// Refresh sessions that expire within this many seconds.
const EXPIRY_MARGIN_SECS: i64 = 30;

/// Error body shapes GoTrue uses across versions.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Map a non-2xx GoTrue response to an [`AuthError`].
fn api_error(status: u16, body: &str) -> AuthError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

    let code = parsed.error_code.clone().or_else(|| {
        parsed
            .code
            .as_ref()
            .and_then(|c| c.as_str().map(str::to_string))
    });
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error.clone())
        .unwrap_or_else(|| body.to_string());

    if code.as_deref() == Some("invalid_credentials")
        || (parsed.error.as_deref() == Some("invalid_grant")
            && message.to_lowercase().contains("invalid login credentials"))
    {
        return AuthError::InvalidCredentials;
    }
    if code.as_deref() == Some("user_already_exists")
        || message.to_lowercase().contains("already registered")
    {
        return AuthError::UserAlreadyExists;
    }
    AuthError::Api { status, message }
}

/// [`AuthBackend`] backed by a GoTrue server.
pub struct GoTrueClient {
    http: reqwest::Client,
    auth_url: String,
    anon_key: String,
    current: RwLock<Option<Session>>,
    storage: Arc<dyn SessionStorage>,
    events: AuthEvents,
}

impl GoTrueClient {
    /// Create a client for the project at `project_url`
    /// (e.g. `https://xyz.supabase.co`).
    pub fn new(project_url: &str, anon_key: String, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_client(reqwest::Client::new(), project_url, anon_key, storage)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        project_url: &str,
        anon_key: String,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            http,
            auth_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key,
            current: RwLock::new(None),
            storage,
            events: AuthEvents::default(),
        }
    }

    /// Number of live auth state subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    // ---- private helpers ----

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{}", self.auth_url, path))
            .header("apikey", &self.anon_key)
    }

    /// Exchange credentials or a refresh token at `POST /token`.
    async fn token_request(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Session, AuthError> {
        let response = self
            .post(&format!("/token?grant_type={grant_type}"))
            .bearer_auth(&self.anon_key)
            .json(&body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let session: Session = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        Ok(session.with_expiry_from(Utc::now().timestamp()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.token_request(
            "refresh_token",
            serde_json::json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    /// Ensure the response has a success status code, mapping GoTrue error
    /// bodies otherwise.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(response)
    }

    /// Make `session` current, persist it and notify subscribers.
    async fn install(&self, session: Session, event: AuthChangeEvent) {
        *self.current.write().await = Some(session.clone());
        if let Err(e) = self.storage.save(&session).await {
            tracing::warn!(error = %e, "Failed to persist session");
        }
        self.events.emit(AuthStateChange::new(event, Some(session)));
    }

    /// Forget the local session and notify subscribers.
    async fn discard(&self) {
        self.current.write().await.take();
        if let Err(e) = self.storage.clear().await {
            tracing::warn!(error = %e, "Failed to clear stored session");
        }
        self.events.emit(AuthStateChange::signed_out());
    }

    /// The in-memory session, else whatever storage holds.
    async fn local_session(&self) -> Option<Session> {
        if let Some(session) = self.current.read().await.clone() {
            return Some(session);
        }
        match self.storage.load().await {
            Ok(Some(session)) => {
                *self.current.write().await = Some(session.clone());
                Some(session)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable stored session");
                None
            }
        }
    }
}

#[async_trait]
impl AuthBackend for GoTrueClient {
    /// Returns the local session, refreshing it first when it is about to
    /// expire. A refresh the server rejects signs the user out; a refresh
    /// that could not reach the server is reported as an error and the
    /// stored session is kept for the next attempt.
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.local_session().await else {
            return Ok(None);
        };

        if !session.expires_within(Utc::now().timestamp(), EXPIRY_MARGIN_SECS) {
            return Ok(Some(session));
        }

        tracing::debug!(user_id = %session.user.id, "Session expired, refreshing");
        match self.refresh(&session.refresh_token).await {
            Ok(refreshed) => {
                self.install(refreshed.clone(), AuthChangeEvent::TokenRefreshed)
                    .await;
                Ok(Some(refreshed))
            }
            Err(e) if e.is_rejection() => {
                tracing::info!(error = %e, "Refresh token rejected, signing out");
                self.discard().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let session = self
            .token_request(
                "password",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        tracing::info!(user_id = %session.user.id, "Signed in");
        self.install(session.clone(), AuthChangeEvent::SignedIn).await;
        Ok(session)
    }

    /// `POST /signup` answers with a session when email confirmation is off
    /// and with the bare user otherwise.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        let response = self
            .post("/signup")
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;

        if body.get("access_token").is_some() {
            let session: Session =
                serde_json::from_value(body).map_err(|e| AuthError::Decode(e.to_string()))?;
            let session = session.with_expiry_from(Utc::now().timestamp());
            tracing::info!(user_id = %session.user.id, "Signed up and signed in");
            self.install(session.clone(), AuthChangeEvent::SignedIn).await;
            return Ok(SignUpOutcome::SignedIn(session));
        }

        let user: User = match body.get("user") {
            Some(user) => serde_json::from_value(user.clone()),
            None => serde_json::from_value(body),
        }
        .map_err(|e| AuthError::Decode(e.to_string()))?;
        tracing::info!(user_id = %user.id, "Signed up, confirmation required");
        Ok(SignUpOutcome::ConfirmationRequired(user))
    }

    /// Revokes the session remotely when possible. The local session is
    /// cleared even if the remote call fails.
    async fn sign_out(&self) -> Result<(), AuthError> {
        let session = self.local_session().await;

        if let Some(session) = &session {
            let result = self
                .post("/logout")
                .bearer_auth(&session.access_token)
                .send()
                .await;
            match result {
                Ok(response) => {
                    if let Err(e) = Self::ensure_success(response).await {
                        tracing::warn!(error = %e, "Remote sign-out failed");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Remote sign-out failed"),
            }
            tracing::info!(user_id = %session.user.id, "Signed out");
        }

        self.discard().await;
        Ok(())
    }
}
