//! The auth backend seam and its change-notification channel.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::AuthError;
use crate::session::{AuthStateChange, Session, SignUpOutcome};

/// The hosted authentication service as consumed by the application.
///
/// Implementations are shared as `Arc<dyn AuthBackend>`.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Fetch the current session, if any. One-shot.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Subscribe to auth state changes. Dropping the returned handle (or
    /// calling [`AuthSubscription::unsubscribe`]) stops delivery.
    fn on_auth_state_change(&self) -> AuthSubscription;

    async fn sign_in_with_password(&self, email: &str, password: &str)
        -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

// ---------------------------------------------------------------------------
// AuthEvents
// ---------------------------------------------------------------------------

/// Default buffer capacity for the notification channel.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out channel for [`AuthStateChange`] notifications, owned by a backend.
pub struct AuthEvents {
    sender: broadcast::Sender<AuthStateChange>,
}

impl AuthEvents {
    /// Create a channel with a specific capacity (at least one).
    ///
    /// When the buffer is full, the oldest undelivered notifications are
    /// dropped and slow subscribers observe [`Notification::Lagged`].
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Deliver a notification to every live subscription.
    pub fn emit(&self, change: AuthStateChange) {
        tracing::debug!(event = ?change.event, signed_in = change.session.is_some(), "Auth state change");
        // Ignore the SendError: it only means there are no subscribers.
        let _ = self.sender.send(change);
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// AuthSubscription
// ---------------------------------------------------------------------------

/// What a subscription yields.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Changed(AuthStateChange),
    /// The subscriber fell behind and `skipped` older notifications were
    /// dropped. Newer ones are still delivered.
    Lagged(u64),
}

/// Handle to a registered auth state subscription.
///
/// Delivery stops when the handle is dropped.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthStateChange>,
}

impl AuthSubscription {
    /// Wait for the next notification. Returns `None` once the backend is gone.
    pub async fn recv(&mut self) -> Option<Notification> {
        match self.receiver.recv().await {
            Ok(change) => Some(Notification::Changed(change)),
            Err(RecvError::Lagged(skipped)) => Some(Notification::Lagged(skipped)),
            Err(RecvError::Closed) => None,
        }
    }

    /// Release the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}
