//! Self-contained auth backend for local development and tests.
//!
//! Accounts and the current session live in memory. The session fetch can
//! be held open or made to fail once, so callers can exercise the
//! bootstrap ordering and failure paths deterministically.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::backend::{AuthBackend, AuthEvents, AuthSubscription};
use crate::error::AuthError;
use crate::session::{AuthChangeEvent, AuthStateChange, Session, SignUpOutcome, User};

/// Access token lifetime for issued sessions.
const SESSION_LIFETIME_SECS: i64 = 3600;

struct Account {
    password: String,
    user: User,
}

#[derive(Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    hold_fetch: Option<Arc<Notify>>,
    fail_next_fetch: bool,
}

/// [`AuthBackend`] holding accounts and the session in process memory.
#[derive(Default)]
pub struct InMemoryAuthBackend {
    inner: Mutex<Inner>,
    events: AuthEvents,
    require_confirmation: bool,
}

impl InMemoryAuthBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign-ups return [`SignUpOutcome::ConfirmationRequired`] instead of a session.
    pub fn requiring_email_confirmation(mut self) -> Self {
        self.require_confirmation = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register an account, returning its user. Re-registering an email
    /// replaces the password and keeps the user.
    pub fn register(&self, email: &str, password: &str) -> User {
        let mut inner = self.lock();
        let account = inner
            .accounts
            .entry(email.to_lowercase())
            .or_insert_with(|| Account {
                password: password.to_string(),
                user: new_user(email),
            });
        account.password = password.to_string();
        account.user.clone()
    }

    /// Make `email` signed in without emitting a notification, as if a
    /// session had been persisted by an earlier run.
    pub fn restore_session(&self, email: &str) -> Option<Session> {
        let mut inner = self.lock();
        let user = inner.accounts.get(&email.to_lowercase())?.user.clone();
        let session = issue_session(user);
        inner.current = Some(session.clone());
        Some(session)
    }

    /// Hold the next [`get_session`](AuthBackend::get_session) call until the
    /// returned [`Notify`] is signalled.
    pub fn hold_session_fetch(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().hold_fetch = Some(Arc::clone(&gate));
        gate
    }

    /// Make the next session fetch fail.
    pub fn fail_next_session_fetch(&self) {
        self.lock().fail_next_fetch = true;
    }

    /// Deliver an arbitrary notification, updating the current session to match.
    pub fn emit(&self, change: AuthStateChange) {
        self.lock().current = change.session.clone();
        self.events.emit(change);
    }

    /// Number of live auth state subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }
}

fn new_user(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        aud: "authenticated".to_string(),
        role: Some("authenticated".to_string()),
        email: Some(email.to_lowercase()),
        email_confirmed_at: None,
        created_at: Some(Utc::now()),
        user_metadata: serde_json::json!({}),
        app_metadata: serde_json::json!({ "provider": "email" }),
    }
}

fn issue_session(user: User) -> Session {
    Session {
        access_token: Uuid::new_v4().to_string(),
        token_type: "bearer".to_string(),
        expires_in: SESSION_LIFETIME_SECS,
        expires_at: Some(Utc::now().timestamp() + SESSION_LIFETIME_SECS),
        refresh_token: Uuid::new_v4().to_string(),
        user,
    }
}

#[async_trait]
impl AuthBackend for InMemoryAuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let gate = self.lock().hold_fetch.take();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut inner = self.lock();
        if std::mem::take(&mut inner.fail_next_fetch) {
            return Err(AuthError::Api {
                status: 503,
                message: "session fetch failed".to_string(),
            });
        }
        Ok(inner.current.clone())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        self.events.subscribe()
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let session = {
            let mut inner = self.lock();
            let account = inner
                .accounts
                .get(&email.to_lowercase())
                .filter(|account| account.password == password)
                .ok_or(AuthError::InvalidCredentials)?;
            let session = issue_session(account.user.clone());
            inner.current = Some(session.clone());
            session
        };
        self.events.emit(AuthStateChange::new(
            AuthChangeEvent::SignedIn,
            Some(session.clone()),
        ));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        if self.lock().accounts.contains_key(&email.to_lowercase()) {
            return Err(AuthError::UserAlreadyExists);
        }
        let user = self.register(email, password);
        if self.require_confirmation {
            return Ok(SignUpOutcome::ConfirmationRequired(user));
        }
        let session = self.sign_in_with_password(email, password).await?;
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.lock().current = None;
        self.events.emit(AuthStateChange::signed_out());
        Ok(())
    }
}
