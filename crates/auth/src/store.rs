//! Observable `{identity, loading}` session state.

use std::sync::Arc;

use tokio::sync::watch;

use crate::session::User;

/// Who is signed in, and whether the initial session check has completed.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<User>,
    pub loading: bool,
}

impl Default for SessionState {
    /// No identity, still loading.
    fn default() -> Self {
        Self {
            identity: None,
            loading: true,
        }
    }
}

/// A partial update merged into [`SessionState`]. `None` fields are left
/// untouched; `identity: Some(None)` clears the identity.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub identity: Option<Option<User>>,
    pub loading: Option<bool>,
}

impl SessionPatch {
    /// Replace the identity, leaving `loading` alone.
    pub fn identity(identity: Option<User>) -> Self {
        Self {
            identity: Some(identity),
            loading: None,
        }
    }

    /// Record the outcome of the initial fetch.
    pub fn loaded(identity: Option<User>) -> Self {
        Self {
            identity: Some(identity),
            loading: Some(false),
        }
    }
}

/// Owned holder of the current [`SessionState`].
///
/// Clones share the same state. Readers take a [`snapshot`](Self::snapshot)
/// or [`subscribe`](Self::subscribe) to be woken on every change; only the
/// [`SessionBootstrapper`](crate::SessionBootstrapper) writes.
#[derive(Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(SessionState::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The current state.
    pub fn snapshot(&self) -> SessionState {
        self.sender.borrow().clone()
    }

    /// A receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.sender.subscribe()
    }

    /// Wait until the initial session check has completed and return the
    /// state at that point.
    pub async fn wait_until_loaded(&self) -> SessionState {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            // The sender lives inside `self`, so it cannot have been dropped.
            Err(_) => self.snapshot(),
        };
        state
    }

    /// Merge `patch` into the current state. Last write wins; readers are
    /// only woken when something actually changed.
    pub(crate) fn set_state(&self, patch: SessionPatch) {
        self.sender.send_if_modified(|state| {
            let before = state.clone();
            if let Some(identity) = patch.identity {
                state.identity = identity;
            }
            if let Some(loading) = patch.loading {
                state.loading = loading;
            }
            *state != before
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
