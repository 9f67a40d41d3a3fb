//! Handler for the root page.

use axum::extract::State;
use axum::response::Html;
use budgetra_auth::resolve_view;

use crate::pages::render_view;
use crate::state::AppState;

/// GET /
///
/// Renders whatever the view gate decides for the current store state.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = resolve_view(&state.session.snapshot());
    Html(render_view(&view))
}
