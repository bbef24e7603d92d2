/// Service error taxonomy
///
/// Every auth and note use-case returns [`ServiceResult`]. The HTTP layer maps
/// each kind to a status code exactly once; services never recover locally.
///
/// | Kind | Meaning |
/// |---|---|
/// | `DuplicateEmail` | registration with an email already in use |
/// | `InvalidCredentials` | unknown email or wrong password |
/// | `Unauthorized` | no caller identity on a protected operation |
/// | `NotFound` | no note matched (missing, not yours, or soft-deleted) |
/// | everything else | internal failure, opaque to clients |

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::store::StoreError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the auth and note services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A user with this email already exists
    #[error("User with this email already exists")]
    DuplicateEmail,

    /// Email unknown or password mismatch
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller identity missing
    #[error("Unauthorized")]
    Unauthorized,

    /// No note matched the caller-scoped filter
    #[error("Note not found")]
    NotFound,

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing or verification failure
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token signing failure
    #[error(transparent)]
    Token(#[from] JwtError),

    /// A blocking task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Task(err.to_string())
    }
}
