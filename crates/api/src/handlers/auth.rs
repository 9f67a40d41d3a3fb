//! Handlers for the authentication form posts.
//!
//! These only call the auth backend. The resulting state change reaches the
//! session store through the bootstrapper's subscription; the handlers wait
//! briefly for it so the redirected page renders the new view.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use budgetra_auth::{AuthError, SessionState, SessionStore, SignUpOutcome};
use serde::Deserialize;

use crate::error::classify_auth_error;
use crate::pages::{render_auth_form, Notice};
use crate::state::AppState;

/// Upper bound on waiting for the store to reflect a sign-in or sign-out.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(2);

/// Form body shared by sign-in and sign-up.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// POST /auth/sign-in
pub async fn sign_in(State(state): State<AppState>, Form(form): Form<Credentials>) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return missing_fields(email);
    }

    match state.auth.sign_in_with_password(email, &form.password).await {
        Ok(session) => {
            let user_id = session.user.id;
            settle(&state.session, |s| {
                s.identity.as_ref().map(|u| u.id) == Some(user_id)
            })
            .await;
            Redirect::to("/").into_response()
        }
        Err(err) => form_error(&err, email),
    }
}

/// POST /auth/sign-up
pub async fn sign_up(State(state): State<AppState>, Form(form): Form<Credentials>) -> Response {
    let email = form.email.trim();
    if email.is_empty() || form.password.is_empty() {
        return missing_fields(email);
    }

    match state.auth.sign_up(email, &form.password).await {
        Ok(SignUpOutcome::SignedIn(session)) => {
            let user_id = session.user.id;
            settle(&state.session, |s| {
                s.identity.as_ref().map(|u| u.id) == Some(user_id)
            })
            .await;
            Redirect::to("/").into_response()
        }
        Ok(SignUpOutcome::ConfirmationRequired(user)) => {
            let message = format!(
                "Check {} for a confirmation link, then sign in.",
                user.display_name()
            );
            Html(render_auth_form(Some(Notice::Info(&message)), email)).into_response()
        }
        Err(err) => form_error(&err, email),
    }
}

/// POST /auth/sign-out
pub async fn sign_out(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.auth.sign_out().await {
        tracing::warn!(error = %e, "Sign-out failed");
    }
    settle(&state.session, |s| s.identity.is_none()).await;
    Redirect::to("/")
}

async fn settle(store: &SessionStore, done: impl FnMut(&SessionState) -> bool) {
    let mut rx = store.subscribe();
    let settled = matches!(
        tokio::time::timeout(SETTLE_TIMEOUT, rx.wait_for(done)).await,
        Ok(Ok(_))
    );
    if !settled {
        tracing::debug!("Session store did not settle before redirect");
    }
}

fn missing_fields(email: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(render_auth_form(
            Some(Notice::Error("Email and password are required.")),
            email,
        )),
    )
        .into_response()
}

/// Re-render the form with the failure, keeping the entered email.
fn form_error(err: &AuthError, email: &str) -> Response {
    let (status, _) = classify_auth_error(err);
    let message = match err {
        _ if status == StatusCode::BAD_GATEWAY => {
            "The authentication service is unavailable, try again later.".to_string()
        }
        AuthError::Api { message, .. } => message.clone(),
        other => other.to_string(),
    };
    (
        status,
        Html(render_auth_form(Some(Notice::Error(&message)), email)),
    )
        .into_response()
}
