//! Maps session state to the view the application should show.

use serde::Serialize;

use crate::session::User;
use crate::store::SessionState;

/// What to render for a given [`SessionState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// The initial session check has not completed.
    Loading,
    /// Nobody is signed in: show the authentication form.
    SignIn,
    /// Someone is signed in: show the main view.
    Main { user: User },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Loading => "loading",
            View::SignIn => "sign_in",
            View::Main { .. } => "main",
        }
    }
}

/// Decide which view to render. Pure: no identity check happens while loading.
pub fn resolve_view(state: &SessionState) -> View {
    if state.loading {
        return View::Loading;
    }
    match &state.identity {
        None => View::SignIn,
        Some(user) => View::Main { user: user.clone() },
    }
}
