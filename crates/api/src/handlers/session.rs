//! Handlers exposing the session store to browser clients.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use budgetra_auth::{resolve_view, SessionState, User, View};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;

use crate::response::DataResponse;
use crate::state::AppState;

/// Store state together with the view the gate derives from it.
#[derive(Debug, Serialize)]
pub struct SessionPayload {
    pub loading: bool,
    /// `loading`, `sign_in` or `main`.
    pub view: &'static str,
    pub user: Option<User>,
}

impl From<&SessionState> for SessionPayload {
    fn from(state: &SessionState) -> Self {
        let view = resolve_view(state);
        let user = match &view {
            View::Main { user } => Some(user.clone()),
            _ => None,
        };
        Self {
            loading: state.loading,
            view: view.name(),
            user,
        }
    }
}

/// GET /api/v1/session
pub async fn get_session(State(state): State<AppState>) -> Json<DataResponse<SessionPayload>> {
    DataResponse::json(SessionPayload::from(&state.session.snapshot()))
}

/// GET /api/v1/session/events
///
/// Sends the current payload immediately, then one `session` event per store
/// change. The stream ends when the server shuts down.
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let stream = WatchStream::new(state.session.subscribe())
        .map(|snapshot| {
            Event::default()
                .event("session")
                .json_data(SessionPayload::from(&snapshot))
        })
        .take_until(state.shutdown.clone().cancelled_owned());

    Sse::new(stream).keep_alive(KeepAlive::default())
}
