use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use budgetra_auth::AuthError;
use budgetra_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `budgetra_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error reported by the auth service.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The initial session check has not completed yet.
    #[error("Session is still loading")]
    SessionLoading,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::Auth(err) => {
                let (status, code) = classify_auth_error(err);
                (status, code, err.to_string())
            }

            // --- HTTP-specific errors ---
            AppError::SessionLoading => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_LOADING",
                "The session check has not completed yet".to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map an auth service failure to an HTTP status and error code.
///
/// Rejections of the request itself keep a 4xx status; an unreachable or
/// failing auth service is reported as a bad gateway.
pub fn classify_auth_error(err: &AuthError) -> (StatusCode, &'static str) {
    match err {
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        AuthError::UserAlreadyExists => (StatusCode::CONFLICT, "USER_ALREADY_EXISTS"),
        AuthError::Api { status, .. } if (400..500).contains(status) => {
            (StatusCode::BAD_REQUEST, "AUTH_REJECTED")
        }
        other => {
            tracing::error!(error = %other, "Auth service error");
            (StatusCode::BAD_GATEWAY, "AUTH_UNAVAILABLE")
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations (`23505`), including a client-supplied primary key
///   that already exists, map to 409.
/// - Check constraint violations (`23514`) map to 400.
/// - Foreign key violations (`23503`) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "BAD_REQUEST",
                        format!("Referenced row does not exist: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_loading_is_service_unavailable() {
        let response = AppError::SessionLoading.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn auth_errors_keep_client_statuses() {
        assert_eq!(
            classify_auth_error(&AuthError::InvalidCredentials),
            (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS")
        );
        assert_eq!(
            classify_auth_error(&AuthError::Api {
                status: 422,
                message: "Password should be at least 6 characters".into(),
            })
            .0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            classify_auth_error(&AuthError::Api {
                status: 500,
                message: "boom".into(),
            })
            .0,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        let id = uuid::Uuid::nil();
        let response = AppError::Core(CoreError::NotFound {
            entity: "Budget",
            id,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
