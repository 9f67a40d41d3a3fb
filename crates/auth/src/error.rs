/// Errors from persisting the session locally.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Errors from the auth backend.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The auth API returned a non-2xx status code.
    #[error("Auth API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered")]
    UserAlreadyExists,

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected auth response: {0}")]
    Decode(String),
}

impl AuthError {
    /// Whether the backend rejected the request itself (4xx) rather than
    /// being unreachable or failing internally.
    pub fn is_rejection(&self) -> bool {
        match self {
            AuthError::Api { status, .. } => (400..500).contains(status),
            AuthError::InvalidCredentials | AuthError::UserAlreadyExists => true,
            _ => false,
        }
    }
}
