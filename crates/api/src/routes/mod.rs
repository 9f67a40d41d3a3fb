pub mod health;
pub mod organization;
pub mod pages;
pub mod session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /session          session state and its event stream
/// /organizations    organizations, their members and budgets
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/session", session::router())
        .nest("/organizations", organization::router())
}
