/// Use-case services
///
/// Thin functions between the HTTP handlers and the stores. Each operation
/// builds its inputs, makes a single store call and maps absence onto a
/// [`crate::error::ServiceError`] kind.
///
/// - `auth`: Registration and login
/// - `notes`: Caller-scoped note CRUD

pub mod auth;
pub mod notes;

pub use auth::{AuthService, LoginOutcome, RegisterUser};
pub use notes::{NewNote, NoteService};
