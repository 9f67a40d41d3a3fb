//! Identity and session payloads as issued by the auth backend.

use budgetra_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// The authenticated user object returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    #[serde(default)]
    pub aud: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<Timestamp>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub app_metadata: serde_json::Value,
}

impl User {
    /// Email if known, otherwise the user id.
    pub fn display_name(&self) -> String {
        self.email.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// A backend-issued record asserting that `user` is authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    /// Unix timestamp (seconds) at which the access token expires.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the backend omitted it.
    pub fn with_expiry_from(mut self, now_unix: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now_unix + self.expires_in);
        }
        self
    }

    /// Whether the access token expires within `margin_secs` of `now_unix`.
    ///
    /// A session without an expiry is treated as still valid.
    pub fn expires_within(&self, now_unix: i64, margin_secs: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now_unix + margin_secs)
    }
}

/// Kind of auth state transition reported to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// One auth state change notification: the event and the session after it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

impl AuthStateChange {
    pub fn new(event: AuthChangeEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }

    pub fn signed_out() -> Self {
        Self::new(AuthChangeEvent::SignedOut, None)
    }

    /// The identity carried by this notification, if any.
    pub fn identity(&self) -> Option<User> {
        self.session.as_ref().map(|s| s.user.clone())
    }
}

/// Result of a sign-up request.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// The account is usable immediately and a session was issued.
    SignedIn(Session),
    /// The backend requires the user to confirm their email first.
    ConfirmationRequired(User),
}
