//! Browser-facing routes: the gated root page and the auth form posts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, gate};
use crate::state::AppState;

/// Routes mounted at the root.
///
/// ```text
/// GET    /                -> gate::index
/// POST   /auth/sign-in    -> auth::sign_in
/// POST   /auth/sign-up    -> auth::sign_up
/// POST   /auth/sign-out   -> auth::sign_out
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(gate::index))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-out", post(auth::sign_out))
}
