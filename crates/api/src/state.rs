use std::sync::Arc;

use budgetra_auth::{AuthBackend, SessionStore};
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: budgetra_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Auth service used by the sign-in, sign-up and sign-out forms.
    pub auth: Arc<dyn AuthBackend>,
    /// Read side of the session store. The bootstrapper is its only writer.
    pub session: SessionStore,
    /// Cancelled when the server starts shutting down; ends open event streams.
    pub shutdown: CancellationToken,
}
