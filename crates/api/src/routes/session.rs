use axum::routing::get;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// Routes mounted at `/session`.
///
/// ```text
/// GET    /         -> get_session
/// GET    /events   -> events (server-sent events)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(session::get_session))
        .route("/events", get(session::events))
}
