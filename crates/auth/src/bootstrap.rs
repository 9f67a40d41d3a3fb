//! Establishes the initial session state and keeps it current.
//!
//! The bootstrapper runs as a single task and is the only writer of the
//! [`SessionStore`]:
//!
//! 1. Subscribe to auth state changes, then fetch the current session.
//! 2. Notifications that arrive while the fetch is pending are buffered.
//! 3. The fetch outcome is written as `{identity, loading: false}` exactly
//!    once. A failed or timed-out fetch counts as "no session".
//! 4. Buffered notifications are applied in order, then live ones as they
//!    arrive. Notifications only ever touch the identity.
//! 5. On teardown the subscription is released and nothing more is written,
//!    including the result of a fetch still in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backend::{AuthBackend, AuthSubscription, Notification};
use crate::session::AuthStateChange;
use crate::store::{SessionPatch, SessionStore};

/// Default upper bound on the initial session fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Drives a [`SessionStore`] from an [`AuthBackend`].
pub struct SessionBootstrapper {
    backend: Arc<dyn AuthBackend>,
    store: SessionStore,
    fetch_timeout: Duration,
}

impl SessionBootstrapper {
    pub fn new(backend: Arc<dyn AuthBackend>, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    /// Spawn the bootstrap task. Must be called within a tokio runtime.
    pub fn start(self) -> BootstrapHandle {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        BootstrapHandle {
            cancel,
            task: Some(task),
        }
    }

    async fn run(self, cancel: CancellationToken) {
        let mut subscription = self.backend.on_auth_state_change();
        let mut open = true;
        let mut buffered: Vec<AuthStateChange> = Vec::new();

        let fetch = tokio::time::timeout(self.fetch_timeout, self.backend.get_session());
        tokio::pin!(fetch);

        let outcome = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("Bootstrapper torn down before the initial session resolved");
                    subscription.unsubscribe();
                    return;
                }
                outcome = &mut fetch => break outcome,
                notification = subscription.recv(), if open => match notification {
                    Some(Notification::Changed(change)) => buffered.push(change),
                    Some(Notification::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth notifications dropped during initial fetch");
                    }
                    None => open = false,
                },
            }
        };

        let identity = match outcome {
            Ok(Ok(session)) => session.map(|s| s.user),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Initial session fetch failed, treating as signed out");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.fetch_timeout.as_secs_f64(),
                    "Initial session fetch timed out, treating as signed out"
                );
                None
            }
        };
        tracing::info!(
            signed_in = identity.is_some(),
            buffered = buffered.len(),
            "Initial session resolved"
        );
        self.store.set_state(SessionPatch::loaded(identity));

        for change in buffered {
            self.apply(change);
        }

        if open {
            self.follow(&mut subscription, &cancel).await;
        }
        subscription.unsubscribe();
        tracing::debug!("Auth state subscription released");
    }

    /// Apply live notifications until torn down or the backend goes away.
    async fn follow(&self, subscription: &mut AuthSubscription, cancel: &CancellationToken) {
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                notification = subscription.recv() => match notification {
                    Some(Notification::Changed(change)) => self.apply(change),
                    Some(Notification::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth notifications dropped, applying newer ones");
                    }
                    None => {
                        tracing::debug!("Auth backend closed its notification channel");
                        return;
                    }
                },
            }
        }
    }

    fn apply(&self, change: AuthStateChange) {
        tracing::debug!(event = ?change.event, "Applying auth state change");
        self.store.set_state(SessionPatch::identity(change.identity()));
    }
}

/// Owner of a running bootstrapper. Dropping it tears the bootstrapper down;
/// [`shutdown`](Self::shutdown) also waits for the task to finish.
pub struct BootstrapHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl BootstrapHandle {
    /// Tear down and wait until the subscription has been released. No store
    /// writes happen after this returns.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Session bootstrapper task failed");
            }
        }
    }
}

impl Drop for BootstrapHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
