//! Session-backed authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use budgetra_auth::User;
use budgetra_core::error::CoreError;
use budgetra_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// The user the session store currently holds.
///
/// The app acts on behalf of whoever is signed in locally, so there is no
/// per-request token. Rejects with 503 while the initial session check is
/// still running and with 401 when nobody is signed in.
///
/// ```ignore
/// async fn my_handler(user: CurrentUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.id(), "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> DbId {
        self.0.id
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let snapshot = state.session.snapshot();
        if snapshot.loading {
            return Err(AppError::SessionLoading);
        }
        snapshot.identity.map(CurrentUser).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Not signed in".into()))
        })
    }
}
