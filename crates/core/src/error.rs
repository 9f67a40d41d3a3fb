use crate::types::DbId;

/// Domain failures shared by the data layer and the HTTP shell.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that breaks a field or budget rule.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The change would leave the organization in an impossible state,
    /// e.g. without an admin.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Nobody is signed in.
    #[error("Not signed in: {0}")]
    Unauthorized(String),

    /// Signed in, but the role does not allow the action.
    #[error("Permission denied: {0}")]
    Forbidden(String),
}
